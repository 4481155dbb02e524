use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Destination already added: {0}")]
    DuplicateDestination(String),

    #[error("Circular dependency detected at: {0}")]
    CircularDependency(String),

    #[error("Invalid destination name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Internal tree operation failed: {0}")]
    Internal(String),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
