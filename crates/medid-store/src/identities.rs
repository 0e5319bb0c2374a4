//! Identity directory: principals and their DID identities.
//!
//! The DID identifier and the (case-folded) email address are both unique.
//! A principal and its identity are inserted together or not at all.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use medid_core::{Did, PrincipalId};
use medid_crypto::{Ed25519KeyPair, Ed25519PublicKey};
use medid_did::DidIdentity;
use medid_vc::{PublicKeyResolver, SigningKeyProvider};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::principal::Principal;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a principal with its identity. Fails with
    /// [`StoreError::Duplicate`] if the DID or email is taken.
    async fn register(&self, principal: Principal, identity: DidIdentity) -> Result<(), StoreError>;

    async fn principal(&self, id: PrincipalId) -> Result<Principal, StoreError>;

    async fn principal_by_did(&self, did: &Did) -> Result<Principal, StoreError>;

    async fn identity(&self, did: &Did) -> Result<DidIdentity, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Directory {
    principals: HashMap<PrincipalId, Principal>,
    by_did: HashMap<Did, PrincipalId>,
    by_email: HashMap<String, PrincipalId>,
    identities: HashMap<Did, DidIdentity>,
}

/// In-memory [`IdentityStore`].
///
/// Also serves as the key directory for Ed25519 proofs: it hands out the
/// server-held signing key of an issuer and resolves verification methods
/// against stored DID documents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    directory: Arc<RwLock<Directory>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.directory.read().principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn register(
        &self,
        principal: Principal,
        identity: DidIdentity,
    ) -> Result<(), StoreError> {
        if principal.did_identifier != identity.identifier {
            return Err(StoreError::Invalid(format!(
                "principal DID {} does not match identity {}",
                principal.did_identifier, identity.identifier
            )));
        }
        let email = email_key(&principal.email);

        let mut dir = self.directory.write();
        if dir.identities.contains_key(&identity.identifier) {
            return Err(StoreError::Duplicate(format!(
                "DID {} already registered",
                identity.identifier
            )));
        }
        if dir.by_email.contains_key(&email) {
            return Err(StoreError::Duplicate(format!("email {email} already registered")));
        }
        if dir.principals.contains_key(&principal.id) {
            return Err(StoreError::Duplicate(format!("principal {} already exists", principal.id)));
        }

        dir.by_did.insert(identity.identifier.clone(), principal.id);
        dir.by_email.insert(email, principal.id);
        dir.identities.insert(identity.identifier.clone(), identity);
        debug!(
            principal_id = %principal.id,
            did = %principal.did_identifier,
            "principal registered"
        );
        dir.principals.insert(principal.id, principal);
        Ok(())
    }

    async fn principal(&self, id: PrincipalId) -> Result<Principal, StoreError> {
        self.directory
            .read()
            .principals
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("principal {id}")))
    }

    async fn principal_by_did(&self, did: &Did) -> Result<Principal, StoreError> {
        let dir = self.directory.read();
        dir.by_did
            .get(did)
            .and_then(|id| dir.principals.get(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("principal with DID {did}")))
    }

    async fn identity(&self, did: &Did) -> Result<DidIdentity, StoreError> {
        self.directory
            .read()
            .identities
            .get(did)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("DID {did}")))
    }

    /// Always reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl SigningKeyProvider for InMemoryIdentityStore {
    fn signing_key(&self, issuer: &Did) -> Option<Ed25519KeyPair> {
        let dir = self.directory.read();
        let secret = dir.identities.get(issuer)?.private_key.as_ref()?;
        match Ed25519KeyPair::from_seed_hex(secret.expose_secret()) {
            Ok(kp) => Some(kp),
            Err(e) => {
                warn!(did = %issuer, error = %e, "stored private key is not an ed25519 seed");
                None
            }
        }
    }
}

impl PublicKeyResolver for InMemoryIdentityStore {
    fn resolve(&self, verification_method: &str) -> Option<Ed25519PublicKey> {
        let (did, _) = verification_method.split_once('#')?;
        let did = Did::new(did).ok()?;
        let dir = self.directory.read();
        let vm = dir
            .identities
            .get(&did)?
            .document
            .verification_method(verification_method)?;
        Ed25519PublicKey::from_tagged(&vm.public_key).ok()
    }
}
