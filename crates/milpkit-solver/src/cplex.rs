use std::collections::BTreeSet;
use std::path::Path;
use std::process::{Command, Stdio};

use milpkit_model::Variable;

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::reader::read_xml_solution;
use crate::solution::Solution;
use crate::solver::ExternalSolver;

/// IBM ILOG CPLEX interactive optimizer, run as `cplex` from `PATH`.
///
/// Results come back as CPLEX's XML solution format, which lists every
/// column. A variable used in the objective but in no constraint is such a
/// column, so solving a model with one returns
/// [`SolverError::UnknownVariable`].
#[derive(Debug, Clone)]
pub struct Cplex {
    config: SolverConfig,
}

impl Cplex {
    pub const DEFAULT_MODEL_PATH: &'static str = "cplex-input.lp";

    pub fn new() -> Self {
        Self::with_config(SolverConfig::new(Self::DEFAULT_MODEL_PATH))
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn with_model_path(mut self, model_path: impl AsRef<Path>) -> Self {
        self.config = self.config.with_model_path(model_path.as_ref());
        self
    }

    /// Discard everything the solver prints.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.config = self.config.quiet(quiet);
        self
    }
}

impl Default for Cplex {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalSolver for Cplex {
    fn name(&self) -> &str {
        "CPLEX"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn command(&self) -> Command {
        let model = self.config.model_path.display();
        let solution = self.config.solution_path();

        let mut command = Command::new("cplex");
        command
            .arg("-c")
            .arg(format!("read {}", model))
            .arg("optimize")
            .arg(format!("write {}", solution.display()))
            .arg("q");
        if self.config.quiet {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        command
    }

    fn read_solution(
        &self,
        universe: &BTreeSet<Variable>,
    ) -> Result<Option<Solution>, SolverError> {
        read_xml_solution(&self.config.solution_path(), universe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command() {
        let cplex = Cplex::new().with_model_path("work/model.lp");
        let command = cplex.command();
        assert_eq!(command.get_program(), "cplex");
        let args: Vec<_> = command.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec!["-c", "read work/model.lp", "optimize", "write work/model.lp.sol", "q"]
        );
    }

    #[test]
    fn test_defaults() {
        let cplex = Cplex::default();
        assert_eq!(cplex.config().model_path, Path::new("cplex-input.lp"));
        assert!(!cplex.config().quiet);
        assert!(Cplex::new().quiet(true).config().quiet);
    }
}
