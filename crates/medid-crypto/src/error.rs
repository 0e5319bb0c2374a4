use thiserror::Error;

/// Error in cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature did not verify against the supplied key and message.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key bytes could not be parsed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Hex text could not be decoded.
    #[error("hex decode error: {0}")]
    Hex(String),
}
