//! # DID Document Builder
//!
//! [`DidDocument::build`] is a pure function of `(identifier, public key)`.
//! The document always has exactly one verification method, `<did>#key-1`,
//! and both `authentication` and `assertionMethod` reference it. Service
//! endpoints are never part of the initial build; they are added with
//! [`add_service`].

use medid_core::Did;
use medid_crypto::ed25519::KEY_TAG;
use serde::{Deserialize, Serialize};

use crate::error::DidError;

pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Fragment of the single primary verification method.
pub const PRIMARY_KEY_FRAGMENT: &str = "key-1";

/// Service type for the portal's own healthcare endpoint.
pub const HEALTHCARE_SERVICE_TYPE: &str = "HealthcareService";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub key_type: String,
    pub controller: Did,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub service_endpoint: String,
}

impl ServiceEndpoint {
    /// The `#healthcare-service` endpoint every registered principal gets.
    pub fn healthcare(did: &Did, endpoint: impl Into<String>) -> Self {
        Self {
            id: did.fragment("healthcare-service"),
            service_type: HEALTHCARE_SERVICE_TYPE.to_string(),
            service_endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    pub id: Did,
    pub verification_method: Vec<VerificationMethod>,
    pub authentication: Vec<String>,
    pub assertion_method: Vec<String>,
    #[serde(default)]
    pub service: Vec<ServiceEndpoint>,
}

impl DidDocument {
    pub fn build(identifier: &Did, public_key: &str) -> Self {
        let key_id = identifier.fragment(PRIMARY_KEY_FRAGMENT);
        Self {
            context: vec![DID_CONTEXT.to_string()],
            id: identifier.clone(),
            verification_method: vec![VerificationMethod {
                id: key_id.clone(),
                key_type: key_type_for(public_key).to_string(),
                controller: identifier.clone(),
                public_key: public_key.to_string(),
            }],
            authentication: vec![key_id.clone()],
            assertion_method: vec![key_id],
            service: Vec::new(),
        }
    }

    /// The verification method used for assertions (credential proofs).
    pub fn assertion_key(&self) -> Option<&VerificationMethod> {
        let id = self.assertion_method.first()?;
        self.verification_method.iter().find(|vm| &vm.id == id)
    }

    /// Find a verification method by its full DID URL.
    pub fn verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.verification_method.iter().find(|vm| vm.id == id)
    }
}

/// Add a service endpoint, returning the updated document.
///
/// The service id must be a fragment of the document's DID and must not
/// already be present.
pub fn add_service(
    mut document: DidDocument,
    service: ServiceEndpoint,
) -> Result<DidDocument, DidError> {
    let prefix = format!("{}#", document.id);
    if !service.id.starts_with(&prefix) || service.id.len() == prefix.len() {
        return Err(DidError::ForeignService {
            service_id: service.id,
            did: document.id.to_string(),
        });
    }
    if document.service.iter().any(|s| s.id == service.id) {
        return Err(DidError::DuplicateService(service.id));
    }
    document.service.push(service);
    Ok(document)
}

fn key_type_for(public_key: &str) -> &'static str {
    if public_key.starts_with(KEY_TAG) {
        "Ed25519VerificationKey2020"
    } else {
        "PlaceholderVerificationKey"
    }
}
