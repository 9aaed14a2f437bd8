use thiserror::Error;

/// Errors raised by the shared value types and depot plumbing.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A value could not be parsed into one of the core types.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
