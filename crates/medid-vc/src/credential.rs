//! # Verifiable Credential envelope
//!
//! [`VerifiableCredential`] follows the W3C VC Data Model 1.1:
//! `@context`, `type`, `issuer`, `issuanceDate`, optional `expirationDate`,
//! `credentialSubject` (with `id`), and `proof`.
//!
//! The envelope is rigid; `credentialSubject` carries arbitrary claims next
//! to its `id`.
//!
//! ## Signing input
//!
//! The bytes a proof covers are the JCS canonical form of the credential with
//! the `proof` member removed. See [`VerifiableCredential::signing_input`].

use medid_core::{sha256_digest, CanonicalBytes, ContentDigest, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::claims::Claims;
use crate::error::VcError;
use crate::kind::VC_BASE_TYPE;
use crate::proof::Proof;

pub const VC_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// JSON-LD `@context`: a single URI or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Single(String),
    Array(Vec<Value>),
}

impl Default for ContextValue {
    fn default() -> Self {
        Self::Array(vec![Value::String(VC_CONTEXT.to_string())])
    }
}

impl ContextValue {
    pub fn includes_vc_context(&self) -> bool {
        match self {
            Self::Single(s) => s == VC_CONTEXT,
            Self::Array(items) => items.iter().any(|v| v.as_str() == Some(VC_CONTEXT)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    pub id: String,
    #[serde(flatten)]
    pub claims: Claims,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: ContextValue,

    /// Always `["VerifiableCredential", <kind>]` when produced by the factory.
    /// A bare string is accepted on input.
    #[serde(rename = "type", deserialize_with = "one_or_many")]
    pub types: Vec<String>,

    pub issuer: String,

    pub issuance_date: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,

    pub credential_subject: CredentialSubject,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiableCredential {
    /// JCS bytes of the credential without its `proof` member.
    pub fn signing_input(&self) -> Result<CanonicalBytes, VcError> {
        let mut val = serde_json::to_value(self)?;
        if let Some(obj) = val.as_object_mut() {
            obj.remove("proof");
        }
        Ok(CanonicalBytes::from_value(&val)?)
    }

    /// The credential as a JSON document (`vcData`).
    pub fn to_document(&self) -> Result<Value, VcError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn has_base_type(&self) -> bool {
        self.types.iter().any(|t| t == VC_BASE_TYPE)
    }

    /// The first type that is not `VerifiableCredential`.
    pub fn specific_type(&self) -> Option<&str> {
        self.types
            .iter()
            .map(String::as_str)
            .find(|t| *t != VC_BASE_TYPE)
    }

    pub fn subject_id(&self) -> &str {
        &self.credential_subject.id
    }

    /// Expired once `now` reaches `expirationDate`. No expiration date means
    /// never expired.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiration_date.is_some_and(|exp| exp <= now)
    }
}

/// Content hash of a credential document, proof included.
///
/// Two documents have the same digest iff they are structurally equal JSON;
/// key order and whitespace do not matter.
pub fn content_digest(document: &Value) -> Result<ContentDigest, VcError> {
    Ok(sha256_digest(&CanonicalBytes::from_value(document)?))
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::ProofType;
    use serde_json::json;

    fn sample() -> VerifiableCredential {
        serde_json::from_value(json!({
            "@context": [VC_CONTEXT],
            "type": ["VerifiableCredential", "BloodTestCredential"],
            "issuer": "did:example:doctorhouse12345678",
            "issuanceDate": "2026-01-15T12:00:00Z",
            "credentialSubject": {"id": "did:example:patientjane12345678", "status": "Normal"},
            "proof": {
                "type": "PlaceholderSignature2024",
                "created": "2026-01-15T12:00:00Z",
                "verificationMethod": "did:example:doctorhouse12345678#key-1",
                "proofPurpose": "assertionMethod",
                "signatureValue": "x"
            }
        }))
        .unwrap()
    }

    #[test]
    fn parses_w3c_shape() {
        let vc = sample();
        assert!(vc.context.includes_vc_context());
        assert!(vc.has_base_type());
        assert_eq!(vc.specific_type(), Some("BloodTestCredential"));
        assert_eq!(vc.subject_id(), "did:example:patientjane12345678");
        assert_eq!(vc.credential_subject.claims["status"], "Normal");
        assert_eq!(
            vc.proof.as_ref().map(|p| &p.proof_type),
            Some(&ProofType::PlaceholderSignature2024)
        );
    }

    #[test]
    fn serialization_flattens_subject_claims() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["credentialSubject"]["id"], "did:example:patientjane12345678");
        assert_eq!(json["credentialSubject"]["status"], "Normal");
        assert!(json.get("expirationDate").is_none());
    }

    #[test]
    fn signing_input_ignores_proof() {
        let a = sample();
        let mut b = sample();
        if let Some(p) = b.proof.as_mut() {
            p.signature_value = "different".into();
        }
        assert_eq!(a.signing_input().unwrap(), b.signing_input().unwrap());
        b.proof = None;
        assert_eq!(a.signing_input().unwrap(), b.signing_input().unwrap());
    }

    #[test]
    fn signing_input_covers_claims() {
        let a = sample();
        let mut b = sample();
        b.credential_subject.claims.insert("status".into(), json!("Abnormal"));
        assert_ne!(a.signing_input().unwrap(), b.signing_input().unwrap());
    }

    #[test]
    fn content_digest_is_structural() {
        let doc = sample().to_document().unwrap();
        let pretty = serde_json::to_string_pretty(&doc).unwrap();
        let reparsed: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(content_digest(&doc).unwrap(), content_digest(&reparsed).unwrap());

        let mut tampered = doc.clone();
        tampered["credentialSubject"]["status"] = json!("Abnormal");
        assert_ne!(content_digest(&doc).unwrap(), content_digest(&tampered).unwrap());
    }

    #[test]
    fn single_type_string_is_accepted() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["type"] = json!("VerifiableCredential");
        let vc: VerifiableCredential = serde_json::from_value(json).unwrap();
        assert_eq!(vc.types, vec!["VerifiableCredential"]);
        assert_eq!(vc.specific_type(), None);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let mut vc = sample();
        let t = Timestamp::parse("2031-01-15T12:00:00Z").unwrap();
        vc.expiration_date = Some(t);
        assert!(!vc.is_expired_at(t.plus_seconds(-1)));
        assert!(vc.is_expired_at(t));
        assert!(vc.is_expired_at(t.plus_seconds(1)));
        vc.expiration_date = None;
        assert!(!vc.is_expired_at(t.plus_years(100)));
    }
}
