//! # medid-did: DID Identity Model
//!
//! Pure construction of decentralized identities for portal principals:
//!
//! - [`IdentityMaterialGenerator`] derives a collision-resistant DID and key
//!   material for a `(role, display name)` pair. Key generation is a
//!   [`KeyMaterialStrategy`]; the placeholder and Ed25519 strategies are
//!   interchangeable without touching callers.
//! - [`DidDocument::build`] assembles the W3C-shaped DID Document for an
//!   identifier and public key. Service endpoints are added afterwards with
//!   [`add_service`].
//! - [`DidIdentity`] is the persisted record; [`PublicDidProfile`] is the
//!   only view of it that leaves the server.
//!
//! Nothing here performs I/O. Uniqueness of identifiers is enforced by the
//! identity store, not by this crate.

pub mod document;
pub mod error;
pub mod generator;
pub mod identity;

pub use document::{
    add_service, DidDocument, ServiceEndpoint, VerificationMethod, HEALTHCARE_SERVICE_TYPE,
};
pub use error::DidError;
pub use generator::{
    Ed25519Keys, GeneratedKeys, IdentityMaterial, IdentityMaterialGenerator, KeyMaterialStrategy,
    PlaceholderKeys, PrivateKeyMaterial,
};
pub use identity::{DidIdentity, PublicDidProfile};

/// DID method used for every identity this portal mints.
pub const DID_METHOD: &str = "example";
