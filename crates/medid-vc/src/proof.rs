//! # Credential proofs
//!
//! The proof object is `{type, created, verificationMethod, proofPurpose,
//! signatureValue}`. Older portal clients wrote the signature under `jws`,
//! and W3C Data Integrity uses `proofValue`; both are accepted on input and
//! normalized to `signatureValue` on output.

use std::fmt;

use medid_core::Timestamp;
use serde::{Deserialize, Serialize};

/// `proofPurpose` for issuer assertions.
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// The proof scheme named by a proof's `type` field.
///
/// Unknown scheme names are preserved so a verifier can report them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProofType {
    /// Ed25519 over the JCS signing input.
    Ed25519Signature2020,
    /// Non-cryptographic demo proof: a content hash of the signing input.
    PlaceholderSignature2024,
    Other(String),
}

impl ProofType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ed25519Signature2020 => "Ed25519Signature2020",
            Self::PlaceholderSignature2024 => "PlaceholderSignature2024",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ProofType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Ed25519Signature2020" => Self::Ed25519Signature2020,
            "PlaceholderSignature2024" => Self::PlaceholderSignature2024,
            _ => Self::Other(s),
        }
    }
}

impl From<ProofType> for String {
    fn from(t: ProofType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: ProofType,
    pub created: Timestamp,
    /// DID URL of the key that produced the signature.
    pub verification_method: String,
    pub proof_purpose: String,
    #[serde(alias = "jws", alias = "proofValue")]
    pub signature_value: String,
}

impl Proof {
    pub fn assertion(
        proof_type: ProofType,
        created: Timestamp,
        verification_method: String,
        signature_value: String,
    ) -> Self {
        Self {
            proof_type,
            created,
            verification_method,
            proof_purpose: ASSERTION_METHOD.to_string(),
            signature_value,
        }
    }

    /// The DID part of `verificationMethod` (before `#`).
    pub fn controller(&self) -> &str {
        self.verification_method
            .split_once('#')
            .map_or(self.verification_method.as_str(), |(did, _)| did)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_legacy_signature_field_names() {
        for field in ["signatureValue", "jws", "proofValue"] {
            let json = serde_json::json!({
                "type": "Ed25519Signature2020",
                "created": "2026-01-15T12:00:00Z",
                "verificationMethod": "did:example:doc#key-1",
                "proofPurpose": "assertionMethod",
                field: "abc"
            });
            let proof: Proof = serde_json::from_value(json).unwrap();
            assert_eq!(proof.signature_value, "abc");
        }
    }

    #[test]
    fn serializes_signature_value() {
        let proof = Proof::assertion(
            ProofType::PlaceholderSignature2024,
            Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
            "did:example:doc#key-1".into(),
            "sig".into(),
        );
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["type"], "PlaceholderSignature2024");
        assert_eq!(json["proofPurpose"], "assertionMethod");
        assert_eq!(json["signatureValue"], "sig");
        assert_eq!(json["created"], "2026-01-15T12:00:00Z");
    }

    #[test]
    fn unknown_proof_type_is_preserved() {
        let t: ProofType = serde_json::from_str("\"BbsBlsSignature2020\"").unwrap();
        assert_eq!(t, ProofType::Other("BbsBlsSignature2020".into()));
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"BbsBlsSignature2020\"");
    }

    #[test]
    fn controller_strips_fragment() {
        let proof = Proof::assertion(
            ProofType::Ed25519Signature2020,
            Timestamp::now(),
            "did:example:doc#key-1".into(),
            String::new(),
        );
        assert_eq!(proof.controller(), "did:example:doc");
    }
}
