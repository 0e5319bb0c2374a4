//! # Credential Store
//!
//! Append-only ledger. Records are never deleted; revocation flips a stored
//! flag exactly once.
//!
//! ## Invariants
//!
//! - `(subject, content hash)` is unique: saving a byte-identical credential
//!   for the same subject twice fails with [`StoreError::Duplicate`].
//! - Listings are ordered newest issuance first; records issued in the same
//!   second come back most recently saved first.
//! - `revoke` runs under the write lock, so concurrent revocations of one id
//!   serialize. Revoking a revoked credential succeeds without change.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use medid_core::{ContentDigest, CredentialId, Did, Timestamp};
use medid_vc::VerifiableCredential;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::record::StoredCredential;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a signed credential and assign it an id.
    async fn save(&self, credential: VerifiableCredential) -> Result<StoredCredential, StoreError>;

    async fn find_by_subject(&self, subject: &Did) -> Result<Vec<StoredCredential>, StoreError>;

    async fn find_by_issuer(&self, issuer: &Did) -> Result<Vec<StoredCredential>, StoreError>;

    async fn find_by_id(&self, id: CredentialId) -> Result<StoredCredential, StoreError>;

    /// Revoke on behalf of `requester`, who must be the issuer.
    ///
    /// Returns the record as it stands after the call.
    async fn revoke(&self, id: CredentialId, requester: &Did) -> Result<Revoked, StoreError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Result of [`CredentialStore::revoke`].
#[derive(Debug, Clone, PartialEq)]
pub struct Revoked {
    pub record: StoredCredential,
    /// This call moved the record from active to revoked.
    pub changed: bool,
}

#[derive(Debug, Default)]
struct Ledger {
    records: HashMap<CredentialId, StoredCredential>,
    /// Insertion order, used to break issuance-date ties.
    sequence: HashMap<CredentialId, u64>,
    next_seq: u64,
    by_subject: HashMap<Did, Vec<CredentialId>>,
    by_issuer: HashMap<Did, Vec<CredentialId>>,
    hashes: HashSet<(Did, ContentDigest)>,
}

impl Ledger {
    fn list(&self, ids: Option<&Vec<CredentialId>>) -> Vec<StoredCredential> {
        let mut out: Vec<(u64, StoredCredential)> = ids
            .into_iter()
            .flatten()
            .filter_map(|id| {
                let seq = self.sequence.get(id).copied().unwrap_or_default();
                self.records.get(id).map(|r| (seq, r.clone()))
            })
            .collect();
        out.sort_by(|(sa, a), (sb, b)| b.issuance_date.cmp(&a.issuance_date).then(sb.cmp(sa)));
        out.into_iter().map(|(_, r)| r).collect()
    }
}

/// In-memory [`CredentialStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    ledger: Arc<RwLock<Ledger>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ledger.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn save(&self, credential: VerifiableCredential) -> Result<StoredCredential, StoreError> {
        let record =
            StoredCredential::from_credential(CredentialId::new(), &credential, Timestamp::now())?;

        let mut ledger = self.ledger.write();
        let key = (record.subject_did.clone(), record.content_hash);
        if ledger.hashes.contains(&key) {
            return Err(StoreError::Duplicate(format!(
                "credential {} already stored for {}",
                record.content_hash, record.subject_did
            )));
        }
        ledger.hashes.insert(key);

        let seq = ledger.next_seq;
        ledger.next_seq += 1;
        ledger.sequence.insert(record.id, seq);
        ledger
            .by_subject
            .entry(record.subject_did.clone())
            .or_default()
            .push(record.id);
        ledger
            .by_issuer
            .entry(record.issuer_did.clone())
            .or_default()
            .push(record.id);
        ledger.records.insert(record.id, record.clone());

        debug!(credential_id = %record.id, subject = %record.subject_did, "credential stored");
        Ok(record)
    }

    async fn find_by_subject(&self, subject: &Did) -> Result<Vec<StoredCredential>, StoreError> {
        let ledger = self.ledger.read();
        Ok(ledger.list(ledger.by_subject.get(subject)))
    }

    async fn find_by_issuer(&self, issuer: &Did) -> Result<Vec<StoredCredential>, StoreError> {
        let ledger = self.ledger.read();
        Ok(ledger.list(ledger.by_issuer.get(issuer)))
    }

    async fn find_by_id(&self, id: CredentialId) -> Result<StoredCredential, StoreError> {
        self.ledger
            .read()
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("credential {id}")))
    }

    async fn revoke(&self, id: CredentialId, requester: &Did) -> Result<Revoked, StoreError> {
        let mut ledger = self.ledger.write();
        let record = ledger
            .records
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("credential {id}")))?;
        if &record.issuer_did != requester {
            return Err(StoreError::Forbidden(format!(
                "only the issuer may revoke credential {id}"
            )));
        }
        let (status, changed) = record.status.revoke();
        if changed {
            record.status = status;
            record.revoked_at = Some(Timestamp::now());
            info!(credential_id = %id, issuer = %requester, "credential revoked");
        }
        Ok(Revoked {
            record: record.clone(),
            changed,
        })
    }

    /// Always reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
