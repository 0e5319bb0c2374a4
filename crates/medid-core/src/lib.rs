//! # medid-core: Foundational Types for the medid Portal
//!
//! Every other crate in the workspace depends on `medid-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** [`Did`], [`PrincipalId`],
//!    [`CredentialId`] and [`NotificationId`] are distinct types. A DID is
//!    validated at construction and at deserialization.
//!
//! 2. **`CanonicalBytes` newtype.** Every content hash in the system (duplicate
//!    detection, ledger membership, placeholder proofs) flows through
//!    [`CanonicalBytes::new()`]. Two structurally equal JSON documents always
//!    produce identical bytes regardless of key order.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] is UTC with a `Z` suffix and
//!    seconds precision, so issuance and expiration dates serialize the same
//!    way every time they are written.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `medid-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod role;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, ValidationError};
pub use identity::{CredentialId, Did, NotificationId, PrincipalId};
pub use role::Role;
pub use temporal::Timestamp;
