use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where a solver binding exchanges files and how loud the solver may be.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// LP document handed to the solver
    pub model_path: PathBuf,
    /// Suppress solver output and demote export diagnostics to `debug`
    pub quiet: bool,
}

impl SolverConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            quiet: false,
        }
    }

    pub fn with_model_path(mut self, model_path: impl Into<PathBuf>) -> Self {
        self.model_path = model_path.into();
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Result artifact written by the solver: `<model_path>.sol`.
    pub fn solution_path(&self) -> PathBuf {
        solution_path_for(&self.model_path)
    }
}

pub(crate) fn solution_path_for(model_path: &Path) -> PathBuf {
    let mut path = OsString::from(model_path.as_os_str());
    path.push(".sol");
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_path() {
        let config = SolverConfig::new("work/scip-input.lp");
        assert_eq!(config.solution_path(), PathBuf::from("work/scip-input.lp.sol"));
    }

    #[test]
    fn test_new_is_not_quiet() {
        let config = SolverConfig::new("m.lp");
        assert_eq!(config.model_path, PathBuf::from("m.lp"));
        assert!(!config.quiet);
    }

    #[test]
    fn test_builders() {
        let config = SolverConfig::new("a.lp").with_model_path("b.lp").quiet(true);
        assert_eq!(config.model_path, PathBuf::from("b.lp"));
        assert!(config.quiet);
    }
}
