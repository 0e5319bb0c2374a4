use medid_core::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DidError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A service with the same id is already present on the document.
    #[error("service {0} already present")]
    DuplicateService(String),

    /// A service id must be a fragment of the document's own DID.
    #[error("service id {service_id} does not belong to {did}")]
    ForeignService { service_id: String, did: String },

    #[error("key material: {0}")]
    KeyMaterial(#[from] medid_crypto::CryptoError),
}
