//! # Canonical Serialization: JCS Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes used in
//! content hashing.
//!
//! ## Invariant
//!
//! The inner field is private. The only way to obtain canonical bytes is
//! [`CanonicalBytes::new()`], which serializes through RFC 8785 (JSON
//! Canonicalization Scheme): sorted keys, compact separators, deterministic
//! number formatting. Any function that hashes a credential must accept
//! `&CanonicalBytes`, so a credential can never be hashed through a
//! key-order-dependent path.
//!
//! Credential claims are arbitrary clinical data and may legitimately contain
//! fractional numbers, so floats are accepted and formatted per JCS.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value cannot
    /// be represented as JSON, or `Rejected` if JCS refuses it.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(&value)
    }

    /// Canonicalize an already-parsed JSON tree.
    pub fn from_value(value: &Value) -> Result<Self, CanonicalizationError> {
        let s = serde_jcs::to_string(value)
            .map_err(|e| CanonicalizationError::Rejected(e.to_string()))?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
