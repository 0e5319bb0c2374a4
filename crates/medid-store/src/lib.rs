//! # medid-store: Persistence Contracts
//!
//! The core talks to persistence only through two traits:
//!
//! - [`CredentialStore`]: append-only credential ledger indexed by subject
//!   and issuer DID, with one-way revocation.
//! - [`IdentityStore`]: principals and their DID identities, with the
//!   identifier as a hard unique key.
//!
//! The in-memory implementations hold a `parking_lot::RwLock` and never keep
//! a guard across an `.await`, so every call completes without suspending.
//! A relational backend would implement the same traits.

pub mod credentials;
pub mod error;
pub mod identities;
pub mod principal;
pub mod record;

pub use credentials::{CredentialStore, InMemoryCredentialStore, Revoked};
pub use error::StoreError;
pub use identities::{IdentityStore, InMemoryIdentityStore};
pub use principal::Principal;
pub use record::StoredCredential;
