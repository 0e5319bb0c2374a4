//! Persisted DID identity and its public projection.

use medid_core::{Did, Timestamp};
use serde::Serialize;

use crate::document::DidDocument;
use crate::generator::{IdentityMaterial, PrivateKeyMaterial};

/// A DID identity as held by the identity store.
///
/// Created once at registration and never modified.
#[derive(Debug, Clone)]
pub struct DidIdentity {
    pub identifier: Did,
    pub document: DidDocument,
    pub public_key: String,
    /// Present only when the server signs on the principal's behalf.
    pub private_key: Option<PrivateKeyMaterial>,
    pub created_at: Timestamp,
}

impl DidIdentity {
    pub fn new(material: IdentityMaterial, document: DidDocument, created_at: Timestamp) -> Self {
        Self {
            identifier: material.did,
            document,
            public_key: material.public_key,
            private_key: Some(material.private_key),
            created_at,
        }
    }

    /// Drop server-held private material.
    pub fn without_private_key(mut self) -> Self {
        self.private_key = None;
        self
    }

    pub fn method(&self) -> &str {
        self.identifier.method()
    }

    pub fn public_profile(&self) -> PublicDidProfile {
        PublicDidProfile {
            did_identifier: self.identifier.clone(),
            method: self.method().to_string(),
            public_key: self.public_key.clone(),
            did_document: self.document.clone(),
        }
    }
}

/// What `GET /v1/did/{did}` returns. Has no private-key field to leak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDidProfile {
    pub did_identifier: Did,
    pub method: String,
    pub public_key: String,
    pub did_document: DidDocument,
}
