use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Variable declared twice: {0}")]
    DuplicateVariable(String),
    #[error("Unknown sense: {0}")]
    UnknownSense(String),
}
