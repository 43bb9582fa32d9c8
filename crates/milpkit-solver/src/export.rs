use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use milpkit_model::{LinearConstraint, LinearExpression, ObjectiveSense, Variable, VariableKind};
use tracing::{debug, info};

use crate::error::SolverError;

/// Every variable that appears on the left of some constraint.
///
/// Constraints alone define the model's variables; one used only in the
/// objective is not declared.
pub fn collect_variables(constraints: &[LinearConstraint]) -> BTreeSet<Variable> {
    constraints.iter().flat_map(|c| c.lhs().variables().cloned()).collect()
}

/// Write an LP document:
///
/// ```text
/// max
///   x2
/// subject to
///   c0: 3.0 x1 + 2.0 x2 <= 6.0
/// general
///   x1
/// end
/// ```
///
/// The `general` and `binary` sections only appear when some variable of
/// `universe` has that kind.
pub fn write_lp<W: Write>(
    out: &mut W,
    sense: ObjectiveSense,
    objective: &LinearExpression,
    constraints: &[LinearConstraint],
    universe: &BTreeSet<Variable>,
) -> io::Result<()> {
    writeln!(out, "{}", sense.keyword())?;
    writeln!(out, "  {}", objective)?;
    writeln!(out, "subject to")?;
    for (i, constraint) in constraints.iter().enumerate() {
        writeln!(out, "  c{}: {}", i, constraint)?;
    }
    write_section(out, "general", universe, VariableKind::Integer)?;
    write_section(out, "binary", universe, VariableKind::Binary)?;
    writeln!(out, "end")
}

fn write_section<W: Write>(
    out: &mut W,
    header: &str,
    universe: &BTreeSet<Variable>,
    kind: VariableKind,
) -> io::Result<()> {
    let mut members = universe.iter().filter(|v| v.kind() == kind).peekable();
    if members.peek().is_none() {
        return Ok(());
    }
    writeln!(out, "{}", header)?;
    for var in members {
        writeln!(out, "  {}", var)?;
    }
    Ok(())
}

/// Remove `path` if it exists.
pub(crate) fn remove_stale(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Replace whatever is at `path` with the LP document for this model and
/// return the variables it declares.
pub fn export_lp(
    path: &Path,
    sense: ObjectiveSense,
    objective: &LinearExpression,
    constraints: &[LinearConstraint],
    quiet: bool,
) -> Result<BTreeSet<Variable>, SolverError> {
    let universe = collect_variables(constraints);
    remove_stale(path)?;

    if quiet {
        debug!(variables = universe.len(), constraints = constraints.len(), "exporting model");
    } else {
        info!("variables: {}, constraints: {}", universe.len(), constraints.len());
    }

    let mut out = BufWriter::new(File::create(path)?);
    write_lp(&mut out, sense, objective, constraints, &universe)?;
    out.flush()?;
    out.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(
        sense: ObjectiveSense,
        objective: &LinearExpression,
        constraints: &[LinearConstraint],
    ) -> String {
        let universe = collect_variables(constraints);
        let mut buf = Vec::new();
        write_lp(&mut buf, sense, objective, constraints, &universe).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_integer_model() {
        let x1 = Variable::integer("x1");
        let x2 = Variable::integer("x2");
        let constraints = vec![
            (3.0 * &x1 + 2.0 * &x2).less_eq(6),
            (-3.0 * &x1 + 2.0 * &x2).less_eq(0),
        ];
        let text = render(ObjectiveSense::Maximize, &x2.to_expression(), &constraints);
        assert_eq!(
            text,
            "max\n  x2\nsubject to\n  c0: 3.0 x1 + 2.0 x2 <= 6.0\n  c1: - 3.0 x1 + 2.0 x2 <= 0.0\ngeneral\n  x1\n  x2\nend\n"
        );
    }

    #[test]
    fn test_sections_by_kind() {
        let r = Variable::continuous("r");
        let b = Variable::binary("b");
        let constraints = vec![(&r + &b).greater_than(1.5), r.less_than(&b)];
        let text = render(ObjectiveSense::Minimize, &(2.0 * &r), &constraints);
        assert_eq!(
            text,
            "min\n  2.0 r\nsubject to\n  c0: b + r > 1.5\n  c1: - b + r < 0.0\nbinary\n  b\nend\n"
        );
    }

    #[test]
    fn test_objective_only_variable_not_declared() {
        let x = Variable::integer("x");
        let y = Variable::integer("y");
        let constraints = vec![x.less_eq(4)];
        let universe = collect_variables(&constraints);
        assert_eq!(universe.len(), 1);
        let text = render(ObjectiveSense::Maximize, &(&x + &y), &constraints);
        assert!(text.contains("general\n  x\nend\n"));
    }

    #[test]
    fn test_cancelled_term_still_declared() {
        let x = Variable::binary("x");
        let y = Variable::continuous("y");
        let constraints = vec![(&x - &x + &y).less_eq(1)];
        let text = render(ObjectiveSense::Minimize, &y.to_expression(), &constraints);
        assert!(text.contains("  c0: y <= 1.0\n"));
        assert!(text.contains("binary\n  x\n"));
    }

    #[test]
    fn test_export_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.lp");
        fs::write(&path, "stale contents that are much longer than the new model\n").unwrap();

        let x = Variable::continuous("x");
        let universe =
            export_lp(&path, ObjectiveSense::Minimize, &x.to_expression(), &[x.greater_eq(1)], true)
                .unwrap();

        assert_eq!(universe.len(), 1);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "min\n  x\nsubject to\n  c0: x >= 1.0\nend\n");
    }
}
