use thiserror::Error;

/// Errors from credential construction, signing, and parsing.
#[derive(Error, Debug)]
pub enum VcError {
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] medid_core::CanonicalizationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Not a recognizable credential type name.
    #[error("invalid credential type: {0:?}")]
    InvalidType(String),

    /// Claims attempted to set a field the factory owns.
    #[error("claim {0:?} is reserved")]
    ReservedClaim(String),

    /// Claims must be a JSON object.
    #[error("claims must be a JSON object")]
    ClaimsNotObject,

    /// Verification input could not be parsed as a credential.
    #[error("malformed credential: {0}")]
    Malformed(String),

    /// The signer has no key for the issuer.
    #[error("no signing key for {0}")]
    MissingSigningKey(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] medid_crypto::CryptoError),

    /// Proof rejected by a signature checker.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
