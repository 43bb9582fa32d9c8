use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use milpkit_model::Variable;

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::reader::read_text_solution;
use crate::solution::Solution;
use crate::solver::ExternalSolver;

/// SCIP Optimization Suite command-line solver.
///
/// The executable defaults to `scip` on `PATH`; point it elsewhere for an
/// alternate install or version.
#[derive(Debug, Clone)]
pub struct Scip {
    config: SolverConfig,
    executable: PathBuf,
}

impl Scip {
    pub const DEFAULT_MODEL_PATH: &'static str = "scip-input.lp";
    pub const DEFAULT_EXECUTABLE: &'static str = "scip";

    pub fn new() -> Self {
        Self::with_config(SolverConfig::new(Self::DEFAULT_MODEL_PATH))
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            executable: PathBuf::from(Self::DEFAULT_EXECUTABLE),
        }
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_model_path(mut self, model_path: impl AsRef<Path>) -> Self {
        self.config = self.config.with_model_path(model_path.as_ref());
        self
    }

    /// Pass `-q` so SCIP keeps its output to itself.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.config = self.config.quiet(quiet);
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl Default for Scip {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalSolver for Scip {
    fn name(&self) -> &str {
        "SCIP"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        if self.config.quiet {
            command.arg("-q");
        }
        command
            .arg("-c")
            .arg(format!("read {}", self.config.model_path.display()))
            .arg("-c")
            .arg("optimize")
            .arg("-c")
            .arg(format!("write solution {}", self.config.solution_path().display()))
            .arg("-c")
            .arg("q");
        command
    }

    fn read_solution(
        &self,
        universe: &BTreeSet<Variable>,
    ) -> Result<Option<Solution>, SolverError> {
        read_text_solution(&self.config.solution_path(), universe)
    }
}
