//! # Ed25519 Signing and Verification
//!
//! Key pairs for DID verification methods and signatures for credential
//! proofs.
//!
//! ## Invariants
//!
//! - Signing input is `&CanonicalBytes`; raw byte slices cannot be signed.
//! - `Ed25519KeyPair` does not implement `Serialize`, and its `Debug` output
//!   is redacted. The seed is only reachable through [`Ed25519KeyPair::seed`],
//!   which exists for server-side demo custody.
//!
//! ## Text forms
//!
//! Public keys and signatures serialize as lowercase hex. Public keys also
//! have a tagged form, `ed25519:<hex>`, which is what a DID Document's
//! verification method carries.

use std::fmt;

use ed25519_dalek::{Signer, Verifier};
use medid_core::CanonicalBytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CryptoError;
use crate::hex;

/// Prefix of the tagged public key text form.
pub const KEY_TAG: &str = "ed25519:";

/// An Ed25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

/// An Ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

/// An Ed25519 signing key pair.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Ed25519PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        hex::decode_fixed::<32>(text)
            .map(Self)
            .map_err(|e| CryptoError::KeyError(e.to_string()))
    }

    /// `ed25519:<hex>`.
    pub fn to_tagged(&self) -> String {
        format!("{KEY_TAG}{}", self.to_hex())
    }

    /// Parse the tagged form. The tag is required.
    pub fn from_tagged(text: &str) -> Result<Self, CryptoError> {
        let body = text
            .strip_prefix(KEY_TAG)
            .ok_or_else(|| CryptoError::KeyError(format!("missing {KEY_TAG} tag")))?;
        Self::from_hex(body)
    }

    fn to_verifying_key(self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e}")))
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({}...)", hex::prefix(&self.0))
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tagged())
    }
}

impl Ed25519Signature {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        hex::decode_fixed::<64>(text)
            .map(Self)
            .map_err(|e| CryptoError::VerificationFailed(e.to_string()))
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({}...)", hex::prefix(&self.0))
    }
}

impl fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Ed25519KeyPair {
    /// Generate a new key pair from the OS RNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Rebuild a key pair from its 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Rebuild a key pair from a hex-encoded seed.
    pub fn from_seed_hex(text: &str) -> Result<Self, CryptoError> {
        let seed = hex::decode_fixed::<32>(text).map_err(|e| CryptoError::KeyError(e.to_string()))?;
        Ok(Self::from_seed(&seed))
    }

    /// The 32-byte seed. Callers holding it are responsible for custody.
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign canonical bytes.
    pub fn sign(&self, data: &CanonicalBytes) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(data.as_bytes()).to_bytes())
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519KeyPair({:?}, <private>)", self.public_key())
    }
}

/// Verify an Ed25519 signature over canonical bytes.
pub fn verify_with_public_key(
    data: &CanonicalBytes,
    signature: &Ed25519Signature,
    public_key: &Ed25519PublicKey,
) -> Result<(), CryptoError> {
    let vk = public_key.to_verifying_key()?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify(data.as_bytes(), &sig)
        .map_err(|e| CryptoError::VerificationFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(v: serde_json::Value) -> CanonicalBytes {
        CanonicalBytes::new(&v).unwrap()
    }

    #[test]
    fn sign_and_verify() {
        let kp = Ed25519KeyPair::generate();
        let msg = canonical(serde_json::json!({"type": ["VerifiableCredential"], "n": 1}));
        let sig = kp.sign(&msg);
        verify_with_public_key(&msg, &sig, &kp.public_key()).unwrap();
    }

    #[test]
    fn wrong_key_fails() {
        let msg = canonical(serde_json::json!({"x": true}));
        let sig = Ed25519KeyPair::generate().sign(&msg);
        let other = Ed25519KeyPair::generate().public_key();
        assert!(verify_with_public_key(&msg, &sig, &other).is_err());
    }

    #[test]
    fn tampered_message_fails() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(&canonical(serde_json::json!({"dose": 1})));
        let tampered = canonical(serde_json::json!({"dose": 2}));
        assert!(verify_with_public_key(&tampered, &sig, &kp.public_key()).is_err());
    }

    #[test]
    fn seed_rebuilds_same_key() {
        let kp = Ed25519KeyPair::generate();
        let seed_hex = hex::encode(&kp.seed());
        let again = Ed25519KeyPair::from_seed_hex(&seed_hex).unwrap();
        assert_eq!(kp.public_key(), again.public_key());
    }

    #[test]
    fn tagged_public_key() {
        let pk = Ed25519KeyPair::from_seed(&[7u8; 32]).public_key();
        let tagged = pk.to_tagged();
        assert!(tagged.starts_with("ed25519:"));
        assert_eq!(tagged.len(), 8 + 64);
        assert_eq!(Ed25519PublicKey::from_tagged(&tagged).unwrap(), pk);
        assert!(Ed25519PublicKey::from_tagged(&pk.to_hex()).is_err());
    }

    #[test]
    fn signature_hex_serde() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(&canonical(serde_json::json!({})));
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json.len(), 128 + 2);
        let back: Ed25519Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn debug_redacts_private_key() {
        let kp = Ed25519KeyPair::from_seed(&[9u8; 32]);
        let dbg = format!("{kp:?}");
        assert!(dbg.contains("<private>"));
        assert!(!dbg.contains(&hex::encode(&kp.seed())));
    }
}
