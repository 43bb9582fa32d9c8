//! Runs the CPLEX binding end to end against a shell script installed as
//! `cplex` at the front of `PATH`.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use milpkit_model::{LinearConstraint, Variable};
use milpkit_solver::{Cplex, ExternalSolver, SolverError};

const WRITE_ARTIFACT: &str = r#"#!/bin/sh
out=""
for arg in "$@"; do
  case "$arg" in
    "write "*) out="${arg#write }" ;;
  esac
done
cat > "$out" <<'SOL'
@ARTIFACT@
SOL
"#;

fn install_cplex(dir: &Path, script: &str) {
    let path = dir.join("cplex");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn cplex_solution(objective: &str, variables: &[(&str, &str)]) -> String {
    let mut xml = format!(
        "<?xml version = \"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <CPLEXSolution version=\"1.2\">\n \
         <header problemName=\"cplex-input.lp\" objectiveValue=\"{}\" solutionStatusValue=\"101\"/>\n \
         <variables>\n",
        objective
    );
    for (index, (name, value)) in variables.iter().enumerate() {
        xml.push_str(&format!(
            "  <variable name=\"{}\" index=\"{}\" value=\"{}\"/>\n",
            name, index, value
        ));
    }
    xml.push_str(" </variables>\n</CPLEXSolution>");
    xml
}

fn model() -> (Variable, Variable, Vec<LinearConstraint>) {
    let x1 = Variable::integer("x1");
    let x2 = Variable::integer("x2");
    let constraints = vec![
        (3.0 * &x1 + 2.0 * &x2).less_eq(6),
        (-3.0 * &x1 + 2.0 * &x2).less_eq(0),
    ];
    (x1, x2, constraints)
}

// The only test in this binary: it rewrites PATH and swaps the script.
#[test]
fn stub_cplex_pipeline() {
    let bin = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let path = std::env::var_os("PATH").unwrap_or_default();
    let mut dirs = vec![bin.path().to_path_buf()];
    dirs.extend(std::env::split_paths(&path));
    let joined = std::env::join_paths(dirs).unwrap();
    // SAFETY: no other thread in this process reads the environment.
    unsafe { std::env::set_var("PATH", joined) };

    let model_path = work.path().join("cplex-input.lp");
    let sol_path = work.path().join("cplex-input.lp.sol");
    let (x1, x2, constraints) = model();
    let cplex = Cplex::new().with_model_path(&model_path).quiet(true);

    // optimal report
    let artifact = cplex_solution("1", &[("x1", "1"), ("x2", "1.0000000000000000")]);
    install_cplex(bin.path(), &WRITE_ARTIFACT.replace("@ARTIFACT@", &artifact));
    let solution = cplex
        .maximize(&x2.to_expression(), &constraints)
        .unwrap()
        .expect("stub reports an optimal solution");
    assert_eq!(solution.objective_value(), 1.0);
    assert_eq!(solution[&x1], 1.0);
    assert_eq!(solution[&x2], 1.0);

    let exported = fs::read_to_string(&model_path).unwrap();
    assert!(exported.starts_with("max\n  x2\nsubject to\n"));
    assert!(sol_path.exists());

    // near-zero values snap and unreported variables default to zero
    let artifact = cplex_solution("0", &[("x1", "4e-9")]);
    install_cplex(bin.path(), &WRITE_ARTIFACT.replace("@ARTIFACT@", &artifact));
    let solution = cplex
        .minimize(&x1.to_expression(), &constraints)
        .unwrap()
        .unwrap();
    assert_eq!(solution[&x1], 0.0);
    assert_eq!(solution[&x2], 0.0);

    // a column used only by the objective is not part of the model
    let y = Variable::continuous("y");
    let artifact = cplex_solution("1", &[("x1", "0"), ("x2", "0"), ("y", "1")]);
    install_cplex(bin.path(), &WRITE_ARTIFACT.replace("@ARTIFACT@", &artifact));
    let err = cplex
        .maximize(&(&x1 + &y), &constraints)
        .unwrap_err();
    assert!(matches!(err, SolverError::UnknownVariable(name) if name == "y"));

    // crashing solver must not be rescued by the previous artifact
    fs::write(&sol_path, cplex_solution("9", &[])).unwrap();
    install_cplex(bin.path(), "#!/bin/sh\nexit 1\n");
    let outcome = cplex.maximize(&x2.to_expression(), &constraints).unwrap();
    assert!(outcome.is_none());
    assert!(!sol_path.exists());
}
