//! # medid-vc: Verifiable Credentials
//!
//! Construction and stateless verification of healthcare credentials in the
//! W3C VC data model.
//!
//! ## Modules
//!
//! - [`credential`]: the VC envelope and its canonical signing input.
//! - [`proof`]: the proof object attached by a [`Signer`].
//! - [`kind`]: the open credential-type enumeration and validity policy.
//! - [`claims`]: deterministic sample claims per credential kind.
//! - [`signer`]: the `Signer` / `SignatureChecker` seam, with placeholder
//!   and Ed25519 strategies.
//! - [`factory`]: builds and signs a credential. No persistence.
//! - [`verifier`]: parses untrusted input and runs the signature and expiry
//!   checks. Ledger membership is the caller's concern.
//! - [`status`]: stored lifecycle state and the derived effective status.

pub mod claims;
pub mod credential;
pub mod error;
pub mod factory;
pub mod kind;
pub mod proof;
pub mod signer;
pub mod status;
pub mod verifier;

pub use claims::{claims_from_value, sample_claims, Claims};
pub use credential::{content_digest, ContextValue, CredentialSubject, VerifiableCredential};
pub use error::VcError;
pub use factory::{CredentialFactory, IssueRequest};
pub use kind::{CredentialKind, ValidityPolicy};
pub use proof::{Proof, ProofType};
pub use signer::{
    Ed25519Checker, Ed25519Signer, PlaceholderChecker, PlaceholderSigner, PublicKeyResolver,
    SignatureChecker, Signer, SigningKeyProvider,
};
pub use status::{CredentialStatus, EffectiveStatus};
pub use verifier::{
    CredentialVerifier, LedgerStatus, LocalChecks, RawCredential, SignatureVerdict,
    VerificationReport,
};
