//! # medid-service: Core Orchestration
//!
//! [`MedidService`] is the boundary the HTTP layer talks to. It wires the
//! identity generator, credential factory and verifier to the stores, enforces
//! role rules, bounds every store call with a deadline, and emits
//! notification events.
//!
//! ## Operations
//!
//! | Operation | Module |
//! |---|---|
//! | `register`, `register_admin`, `login_with_did`, `did_profile` | [`registration`] |
//! | `issue_to_patient`, `sample_preview` | [`issuance`] |
//! | `verify` | [`verification`] |
//! | `credentials_for`, `credential_by_id`, `revoke` | [`ledger`] |
//!
//! Every fallible operation returns [`ServiceError`].

pub mod config;
pub mod deadline;
pub mod error;
pub mod issuance;
pub mod ledger;
pub mod notify;
pub mod registration;
pub mod verification;

use std::sync::Arc;

use medid_did::IdentityMaterialGenerator;
use medid_store::{CredentialStore, IdentityStore, InMemoryCredentialStore, InMemoryIdentityStore};
use medid_vc::{
    CredentialFactory, CredentialVerifier, Ed25519Checker, Ed25519Signer, PlaceholderChecker,
    PlaceholderSigner, SignatureChecker, Signer,
};

pub use config::{ProofMode, ServiceConfig, DEFAULT_HEALTHCARE_ENDPOINT};
pub use error::ServiceError;
pub use issuance::{sample_preview, IssueCredential, IssuedCredential, SAMPLE_PATIENT_NAME};
pub use ledger::{CredentialView, Revocation};
pub use notify::{
    ChannelNotifier, Notification, NotificationEvent, NotificationInbox, NotificationKind,
    Notifier, NullNotifier,
};
pub use registration::{Registered, Registration};

/// Collaborators injected into [`MedidService::new`].
#[derive(Clone)]
pub struct ServiceParts {
    pub credentials: Arc<dyn CredentialStore>,
    pub identities: Arc<dyn IdentityStore>,
    pub generator: IdentityMaterialGenerator,
    pub signer: Arc<dyn Signer>,
    pub checker: Arc<dyn SignatureChecker>,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Clone)]
pub struct MedidService {
    credentials: Arc<dyn CredentialStore>,
    identities: Arc<dyn IdentityStore>,
    generator: IdentityMaterialGenerator,
    factory: CredentialFactory,
    verifier: CredentialVerifier,
    notifier: Arc<dyn Notifier>,
    config: ServiceConfig,
}

impl MedidService {
    pub fn new(config: ServiceConfig, parts: ServiceParts) -> Self {
        Self {
            credentials: parts.credentials,
            identities: parts.identities,
            generator: parts.generator,
            factory: CredentialFactory::new(parts.signer),
            verifier: CredentialVerifier::new(parts.checker)
                .with_max_payload_bytes(config.max_verify_bytes),
            notifier: parts.notifier,
            config,
        }
    }

    /// In-memory stores with proof strategies chosen by `config.proof_mode`.
    ///
    /// In Ed25519 mode the identity store doubles as the issuer key provider
    /// and the verification-method resolver.
    pub fn in_memory(config: ServiceConfig, notifier: Arc<dyn Notifier>) -> Self {
        let identities = InMemoryIdentityStore::new();
        let (generator, signer, checker): (_, Arc<dyn Signer>, Arc<dyn SignatureChecker>) =
            match config.proof_mode {
                ProofMode::Placeholder => (
                    IdentityMaterialGenerator::placeholder(),
                    Arc::new(PlaceholderSigner),
                    Arc::new(PlaceholderChecker),
                ),
                ProofMode::Ed25519 => (
                    IdentityMaterialGenerator::ed25519(),
                    Arc::new(Ed25519Signer::new(Arc::new(identities.clone()))),
                    Arc::new(Ed25519Checker::new(Arc::new(identities.clone()))),
                ),
            };
        Self::new(
            config,
            ServiceParts {
                credentials: Arc::new(InMemoryCredentialStore::new()),
                identities: Arc::new(identities),
                generator,
                signer,
                checker,
                notifier,
            },
        )
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Both stores answer within the store deadline.
    pub async fn ready(&self) -> Result<(), ServiceError> {
        let limit = self.config.store_timeout;
        deadline::within(limit, "identity ping", self.identities.ping()).await?;
        deadline::within(limit, "credential ping", self.credentials.ping()).await
    }
}

impl std::fmt::Debug for MedidService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedidService")
            .field("generator", &self.generator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use medid_core::Role;
    use parking_lot::Mutex;

    use super::*;

    pub fn service() -> MedidService {
        MedidService::in_memory(ServiceConfig::default(), Arc::new(NullNotifier))
    }

    async fn enroll(svc: &MedidService, role: Role, first: &str, last: &str) -> Registered {
        svc.register(Registration {
            role,
            first_name: first.into(),
            last_name: last.into(),
            email: format!("{first}.{last}@example.com").to_lowercase(),
        })
        .await
        .unwrap()
    }

    pub async fn patient(svc: &MedidService, first: &str, last: &str) -> Registered {
        enroll(svc, Role::Patient, first, last).await
    }

    pub async fn doctor(svc: &MedidService, first: &str, last: &str) -> Registered {
        enroll(svc, Role::Doctor, first, last).await
    }

    /// Keeps every event in emission order.
    #[derive(Default)]
    pub struct RecordingNotifier {
        events: Mutex<Vec<NotificationEvent>>,
    }

    impl RecordingNotifier {
        pub fn events(&self) -> Vec<NotificationEvent> {
            self.events.lock().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, event: NotificationEvent) {
            self.events.lock().push(event);
        }
    }
}
