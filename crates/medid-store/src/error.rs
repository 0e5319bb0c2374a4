use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    /// Caller does not own the record it tried to change.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unique constraint violated.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// Record could not be derived from its input.
    #[error("invalid record: {0}")]
    Invalid(String),

    /// Backend did not answer.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
