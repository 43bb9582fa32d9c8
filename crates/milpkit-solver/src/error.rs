use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Solver reported a variable that is not in the model: {0}")]
    UnknownVariable(String),
}
