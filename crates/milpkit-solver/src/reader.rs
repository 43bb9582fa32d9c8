//! Result artifact readers.
//!
//! Both readers start from a solution with every model variable at 0.0, so
//! an optimal but sparse report still assigns every variable. Reported
//! values below [`EPSILON`] in magnitude are snapped to exactly zero, and a
//! reported name that is not a model variable is a lookup error. Anything
//! else that goes wrong (missing file, wrong status, malformed content,
//! non-finite numbers) means there is no solution.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use milpkit_model::{EPSILON, Variable};
use tracing::debug;

use crate::error::SolverError;
use crate::solution::Solution;

/// First line of a SCIP solution file for a solved model.
pub const OPTIMAL_STATUS: &str = "solution status: optimal solution found";

struct Lookup<'a> {
    by_name: HashMap<&'a str, &'a Variable>,
}

impl<'a> Lookup<'a> {
    fn new(universe: &'a BTreeSet<Variable>) -> Self {
        Self {
            by_name: universe.iter().map(|v| (v.name(), v)).collect(),
        }
    }

    fn get(&self, name: &str) -> Result<Variable, SolverError> {
        self.by_name
            .get(name)
            .map(|&v| v.clone())
            .ok_or_else(|| SolverError::UnknownVariable(name.to_string()))
    }
}

fn snap(value: f64) -> f64 {
    if value.abs() < EPSILON { 0.0 } else { value }
}

// `nan` and `inf` parse as f64 but are not values a solver can report.
fn parse_finite(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn read_artifact(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no result artifact");
            None
        }
    }
}

/// Read a CPLEX XML solution file.
pub fn read_xml_solution(
    path: &Path,
    universe: &BTreeSet<Variable>,
) -> Result<Option<Solution>, SolverError> {
    match read_artifact(path) {
        Some(text) => parse_xml_solution(&text, universe),
        None => Ok(None),
    }
}

/// Parse a CPLEX XML solution: the objective comes from the `objectiveValue`
/// attribute of `header`, values from `variables/variable` elements.
pub fn parse_xml_solution(
    text: &str,
    universe: &BTreeSet<Variable>,
) -> Result<Option<Solution>, SolverError> {
    let doc = match roxmltree::Document::parse(text) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(error = %e, "malformed XML solution");
            return Ok(None);
        }
    };
    let root = doc.root_element();

    let objective = root
        .children()
        .find(|n| n.has_tag_name("header"))
        .and_then(|header| header.attribute("objectiveValue"))
        .and_then(parse_finite);
    let Some(objective) = objective else {
        debug!("XML solution has no objective value");
        return Ok(None);
    };

    let lookup = Lookup::new(universe);
    let mut solution = Solution::zeroed(universe, objective);

    let variables = root
        .children()
        .filter(|n| n.has_tag_name("variables"))
        .flat_map(|n| n.children())
        .filter(|n| n.has_tag_name("variable"));
    for node in variables {
        let (Some(name), Some(value)) = (node.attribute("name"), node.attribute("value")) else {
            debug!("variable element without name or value");
            return Ok(None);
        };
        let Some(value) = parse_finite(value) else {
            debug!(name, value, "unparsable variable value");
            return Ok(None);
        };
        solution.set(lookup.get(name)?, snap(value));
    }

    Ok(Some(solution))
}

/// Read a SCIP solution file.
pub fn read_text_solution(
    path: &Path,
    universe: &BTreeSet<Variable>,
) -> Result<Option<Solution>, SolverError> {
    match read_artifact(path) {
        Some(text) => parse_text_solution(&text, universe),
        None => Ok(None),
    }
}

/// Parse a SCIP solution: a status line that must be [`OPTIMAL_STATUS`], an
/// objective line whose last token is the value, then `<name> <value> ...`
/// lines. Blank lines are skipped.
pub fn parse_text_solution(
    text: &str,
    universe: &BTreeSet<Variable>,
) -> Result<Option<Solution>, SolverError> {
    let mut lines = text.lines();

    let status = lines.next().map(str::trim).unwrap_or_default();
    if status != OPTIMAL_STATUS {
        debug!(status, "solver did not report an optimal solution");
        return Ok(None);
    }

    let objective = lines
        .next()
        .and_then(|line| line.split_whitespace().last())
        .and_then(parse_finite);
    let Some(objective) = objective else {
        debug!("missing objective value line");
        return Ok(None);
    };

    let lookup = Lookup::new(universe);
    let mut solution = Solution::zeroed(universe, objective);

    for line in lines {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };
        let Some(value) = tokens.next().and_then(parse_finite) else {
            debug!(line, "unparsable solution line");
            return Ok(None);
        };
        solution.set(lookup.get(name)?, snap(value));
    }

    Ok(Some(solution))
}
