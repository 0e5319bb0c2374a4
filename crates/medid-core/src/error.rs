//! # Error Types
//!
//! Leaf error types shared by every crate in the workspace. Higher layers wrap
//! these with `#[from]` into their own `thiserror` enums.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The value could not be converted into a JSON tree.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// JCS rejected the value (e.g. a non-finite number).
    #[error("canonical form rejected: {0}")]
    Rejected(String),
}

/// A domain primitive failed validation at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// String is not of the form `did:<method>:<method-specific-id>`.
    #[error("invalid DID: {0:?}")]
    InvalidDid(String),

    /// Timestamp string is not RFC 3339 or not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Unknown principal role.
    #[error("unknown role: {0:?}")]
    InvalidRole(String),

    /// Identifier string is not a UUID.
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
}
