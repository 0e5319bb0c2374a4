//! Persisted credential record.

use medid_core::{ContentDigest, CredentialId, Did, Timestamp};
use medid_vc::{
    content_digest, CredentialKind, CredentialStatus, EffectiveStatus, VerifiableCredential,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// A credential as held by the ledger.
///
/// `vc_data` is the signed document exactly as issued and is never rewritten.
/// Only `status` and `revoked_at` change, and only once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredential {
    pub id: CredentialId,
    pub issuer_did: Did,
    pub subject_did: Did,
    pub credential_type: CredentialKind,
    pub vc_data: Value,
    pub content_hash: ContentDigest,
    pub issuance_date: Timestamp,
    pub expiration_date: Option<Timestamp>,
    pub status: CredentialStatus,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl StoredCredential {
    /// Derive a record from a signed credential.
    pub fn from_credential(
        id: CredentialId,
        credential: &VerifiableCredential,
        created_at: Timestamp,
    ) -> Result<Self, StoreError> {
        let invalid = |e: &dyn std::fmt::Display| StoreError::Invalid(e.to_string());
        let issuer_did = Did::new(credential.issuer.as_str()).map_err(|e| invalid(&e))?;
        let subject_did = Did::new(credential.subject_id()).map_err(|e| invalid(&e))?;
        let credential_type: CredentialKind = credential
            .specific_type()
            .ok_or_else(|| StoreError::Invalid("credential has no specific type".into()))?
            .parse()
            .map_err(|e| invalid(&e))?;
        let vc_data = credential.to_document().map_err(|e| invalid(&e))?;
        let content_hash = content_digest(&vc_data).map_err(|e| invalid(&e))?;

        Ok(Self {
            id,
            issuer_did,
            subject_did,
            credential_type,
            vc_data,
            content_hash,
            issuance_date: credential.issuance_date,
            expiration_date: credential.expiration_date,
            status: CredentialStatus::Active,
            revoked_at: None,
            created_at,
        })
    }

    pub fn effective_status(&self, now: Timestamp) -> EffectiveStatus {
        self.status.effective(self.expiration_date, now)
    }

    pub fn is_revoked(&self) -> bool {
        self.status == CredentialStatus::Revoked
    }
}
