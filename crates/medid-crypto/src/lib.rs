//! # medid-crypto: Cryptographic Primitives
//!
//! - **Ed25519** key pairs, public keys and signatures over
//!   [`CanonicalBytes`](medid_core::CanonicalBytes), used by the Ed25519
//!   credential proof strategy and the Ed25519 identity key generator.
//! - **Hex** encoding for key and signature transport.
//! - **Entropy** for DID suffixes.
//!
//! ## Crate Policy
//!
//! - Depends only on `medid-core` internally.
//! - Private key bytes never appear in `Debug` output or serialized forms.

pub mod ed25519;
pub mod error;
pub mod hex;
pub mod random;

pub use ed25519::{verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use error::CryptoError;
pub use random::random_base36;
