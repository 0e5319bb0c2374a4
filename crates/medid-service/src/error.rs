//! # Service Errors
//!
//! [`ServiceError`] is the only error type that leaves the core. Store,
//! credential and DID errors are folded into it here so that callers match on
//! one taxonomy with stable machine-readable codes.

use medid_did::DidError;
use medid_store::StoreError;
use medid_vc::VcError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Role or ownership violation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Verification input could not be read as a credential.
    #[error("malformed credential: {0}")]
    MalformedCredential(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A store call failed or did not answer in time. Nothing was written.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("invalid credential type: {0}")]
    InvalidType(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::MalformedCredential(_) => "MALFORMED_CREDENTIAL",
            Self::Duplicate(_) => "DUPLICATE",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::InvalidType(_) => "INVALID_TYPE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Forbidden(msg) => Self::Forbidden(msg),
            StoreError::Duplicate(msg) => Self::Duplicate(msg),
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
            StoreError::Invalid(msg) => Self::Internal(msg),
        }
    }
}

impl From<VcError> for ServiceError {
    fn from(err: VcError) -> Self {
        match err {
            VcError::Malformed(msg) => Self::MalformedCredential(msg),
            VcError::InvalidType(name) => Self::InvalidType(name),
            VcError::ReservedClaim(_) | VcError::ClaimsNotObject => {
                Self::Validation(err.to_string())
            }
            VcError::MissingSigningKey(did) => {
                Self::Forbidden(format!("no signing key held for issuer {did}"))
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<DidError> for ServiceError {
    fn from(err: DidError) -> Self {
        match err {
            DidError::Validation(e) => Self::Validation(e.to_string()),
            DidError::DuplicateService(id) => Self::Duplicate(format!("service {id}")),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let cases = [
            (ServiceError::Forbidden("x".into()), "FORBIDDEN"),
            (ServiceError::NotFound("x".into()), "NOT_FOUND"),
            (ServiceError::MalformedCredential("x".into()), "MALFORMED_CREDENTIAL"),
            (ServiceError::Duplicate("x".into()), "DUPLICATE"),
            (ServiceError::StoreUnavailable("x".into()), "STORE_UNAVAILABLE"),
            (ServiceError::InvalidType("x".into()), "INVALID_TYPE"),
            (ServiceError::Validation("x".into()), "VALIDATION_ERROR"),
            (ServiceError::Internal("x".into()), "INTERNAL_ERROR"),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn store_errors_map_by_kind() {
        assert_eq!(
            ServiceError::from(StoreError::Forbidden("nope".into())),
            ServiceError::Forbidden("nope".into())
        );
        assert_eq!(
            ServiceError::from(StoreError::Unavailable("down".into())).code(),
            "STORE_UNAVAILABLE"
        );
        assert_eq!(
            ServiceError::from(StoreError::Invalid("bad".into())).code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn vc_errors_map_by_kind() {
        assert_eq!(
            ServiceError::from(VcError::Malformed("not json".into())).code(),
            "MALFORMED_CREDENTIAL"
        );
        assert_eq!(
            ServiceError::from(VcError::InvalidType("Foo".into())).code(),
            "INVALID_TYPE"
        );
        assert_eq!(
            ServiceError::from(VcError::ReservedClaim("id".into())).code(),
            "VALIDATION_ERROR"
        );
    }
}
