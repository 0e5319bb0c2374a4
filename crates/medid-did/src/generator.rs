//! # Identity Material Generator
//!
//! `generate(role, display_name)` produces a DID of the form
//!
//! ```text
//! did:example:<role><normalized-name><8 base-36 chars>
//! ```
//!
//! together with a key pair from the configured [`KeyMaterialStrategy`].
//! The random suffix carries just over 41 bits of entropy. The identity store
//! still treats the identifier as a hard unique key and rejects collisions.

use std::fmt;
use std::sync::Arc;

use medid_core::{Did, Role};
use medid_crypto::{hex, random_base36, Ed25519KeyPair};

use crate::error::DidError;
use crate::DID_METHOD;

const SUFFIX_LEN: usize = 8;
const MAX_NAME_FRAGMENT: usize = 32;

/// Private key text held server-side for demo signing.
///
/// Never serialized; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKeyMaterial(String);

impl PrivateKeyMaterial {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKeyMaterial(<redacted>)")
    }
}

/// A freshly generated public/private key pair in text form.
#[derive(Debug, Clone)]
pub struct GeneratedKeys {
    pub public_key: String,
    pub private_key: PrivateKeyMaterial,
}

/// Strategy for producing identity key material.
pub trait KeyMaterialStrategy: Send + Sync {
    /// Short name recorded in logs.
    fn name(&self) -> &'static str;

    fn generate(&self) -> Result<GeneratedKeys, DidError>;
}

/// Non-cryptographic key material for demos: random base-36 tokens tagged
/// `placeholder:`. Nothing can be signed with these keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderKeys;

impl KeyMaterialStrategy for PlaceholderKeys {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn generate(&self) -> Result<GeneratedKeys, DidError> {
        Ok(GeneratedKeys {
            public_key: format!("placeholder:{}", random_base36(32)),
            private_key: PrivateKeyMaterial::new(format!("placeholder:{}", random_base36(32))),
        })
    }
}

/// Real Ed25519 key pairs. Public key is `ed25519:<hex>`, private material
/// is the hex seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Keys;

impl KeyMaterialStrategy for Ed25519Keys {
    fn name(&self) -> &'static str {
        "ed25519"
    }

    fn generate(&self) -> Result<GeneratedKeys, DidError> {
        let kp = Ed25519KeyPair::generate();
        Ok(GeneratedKeys {
            public_key: kp.public_key().to_tagged(),
            private_key: PrivateKeyMaterial::new(hex::encode(&kp.seed())),
        })
    }
}

/// Output of [`IdentityMaterialGenerator::generate`].
#[derive(Debug, Clone)]
pub struct IdentityMaterial {
    pub did: Did,
    pub public_key: String,
    pub private_key: PrivateKeyMaterial,
}

/// Derives DIDs and key material for new principals.
#[derive(Clone)]
pub struct IdentityMaterialGenerator {
    keys: Arc<dyn KeyMaterialStrategy>,
}

impl IdentityMaterialGenerator {
    pub fn new(keys: Arc<dyn KeyMaterialStrategy>) -> Self {
        Self { keys }
    }

    pub fn placeholder() -> Self {
        Self::new(Arc::new(PlaceholderKeys))
    }

    pub fn ed25519() -> Self {
        Self::new(Arc::new(Ed25519Keys))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.keys.name()
    }

    pub fn generate(&self, role: Role, display_name: &str) -> Result<IdentityMaterial, DidError> {
        let did = Did::new(format!(
            "did:{DID_METHOD}:{}{}{}",
            role.as_str(),
            normalize_name(display_name),
            random_base36(SUFFIX_LEN)
        ))?;
        let keys = self.keys.generate()?;
        Ok(IdentityMaterial {
            did,
            public_key: keys.public_key,
            private_key: keys.private_key,
        })
    }
}

impl fmt::Debug for IdentityMaterialGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityMaterialGenerator")
            .field("keys", &self.keys.name())
            .finish()
    }
}

/// Lowercase ASCII alphanumerics of the display name, capped in length.
fn normalize_name(display_name: &str) -> String {
    display_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_NAME_FRAGMENT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn did_carries_role_name_and_suffix() {
        let m = IdentityMaterialGenerator::placeholder()
            .generate(Role::Patient, "Jane Doe")
            .unwrap();
        let id = m.did.method_specific_id();
        assert_eq!(m.did.method(), "example");
        assert!(id.starts_with("patientjanedoe"), "{id}");
        assert_eq!(id.len(), "patientjanedoe".len() + SUFFIX_LEN);
    }

    #[test]
    fn punctuation_is_dropped_from_name() {
        assert_eq!(normalize_name("Dr. O'Brien / #1"), "drobrien1");
        assert_eq!(normalize_name("Zoë"), "zo");
    }

    #[test]
    fn empty_name_still_yields_valid_did() {
        let m = IdentityMaterialGenerator::placeholder()
            .generate(Role::Doctor, "   ")
            .unwrap();
        assert!(m.did.method_specific_id().starts_with("doctor"));
    }

    #[test]
    fn repeated_generation_does_not_collide() {
        let gen = IdentityMaterialGenerator::placeholder();
        let dids: HashSet<_> = (0..500)
            .map(|_| gen.generate(Role::Patient, "Same Name").unwrap().did)
            .collect();
        assert_eq!(dids.len(), 500);
    }

    #[test]
    fn ed25519_strategy_produces_usable_keys() {
        let m = IdentityMaterialGenerator::ed25519()
            .generate(Role::Doctor, "Greg House")
            .unwrap();
        let kp = Ed25519KeyPair::from_seed_hex(m.private_key.expose_secret()).unwrap();
        assert_eq!(kp.public_key().to_tagged(), m.public_key);
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let m = IdentityMaterialGenerator::placeholder()
            .generate(Role::Patient, "A")
            .unwrap();
        let dbg = format!("{m:?}");
        assert!(!dbg.contains(m.private_key.expose_secret()));
    }

    proptest! {
        #[test]
        fn any_display_name_yields_valid_did(name in "\\PC{0,64}") {
            let m = IdentityMaterialGenerator::placeholder()
                .generate(Role::Patient, &name)
                .unwrap();
            prop_assert!(Did::new(m.did.as_str()).is_ok());
        }
    }
}
