//! Principal registration and DID login.
//!
//! Registration mints a DID, builds its document with the default
//! `HealthcareService` endpoint, and persists principal and identity together.
//! Private key material is kept only when the proof mode signs server-side.

use medid_core::{Did, PrincipalId, Role, Timestamp};
use medid_did::{add_service, DidDocument, DidIdentity, PublicDidProfile, ServiceEndpoint};
use medid_store::Principal;
use serde::Serialize;
use tracing::info;

use crate::deadline::within;
use crate::error::ServiceError;
use crate::notify::{NotificationEvent, NotificationKind};
use crate::MedidService;

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Registration {
    fn validate(&self) -> Result<(), ServiceError> {
        let first = self.first_name.trim();
        if first.is_empty() {
            return Err(ServiceError::Validation("first name must not be empty".into()));
        }
        if first.len() > MAX_NAME_LEN || self.last_name.trim().len() > MAX_NAME_LEN {
            return Err(ServiceError::Validation(format!(
                "names must not exceed {MAX_NAME_LEN} characters"
            )));
        }
        let email = self.email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
            return Err(ServiceError::Validation(format!("invalid email address: {email:?}")));
        }
        Ok(())
    }
}

/// A newly registered principal and its public DID view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    pub principal: Principal,
    pub did: PublicDidProfile,
}

impl MedidService {
    /// Self-service registration for patients and doctors.
    pub async fn register(&self, request: Registration) -> Result<Registered, ServiceError> {
        if request.role == Role::Admin {
            return Err(ServiceError::Validation(
                "role must be patient or doctor".into(),
            ));
        }
        self.enroll(request).await
    }

    /// Provision an admin principal. Not reachable through self-service.
    pub async fn register_admin(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Registered, ServiceError> {
        self.enroll(Registration {
            role: Role::Admin,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        })
        .await
    }

    async fn enroll(&self, request: Registration) -> Result<Registered, ServiceError> {
        request.validate()?;
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        let display_name = format!("{first_name} {last_name}");

        let material = self.generator.generate(request.role, &display_name)?;
        let document = add_service(
            DidDocument::build(&material.did, &material.public_key),
            ServiceEndpoint::healthcare(&material.did, self.config.healthcare_endpoint.clone()),
        )?;

        let now = Timestamp::now();
        let mut identity = DidIdentity::new(material, document, now);
        if !self.config.proof_mode.holds_private_keys() {
            identity = identity.without_private_key();
        }
        let principal = Principal {
            id: PrincipalId::new(),
            role: request.role,
            did_identifier: identity.identifier.clone(),
            first_name,
            last_name,
            email: request.email.trim().to_string(),
            created_at: now,
        };

        within(
            self.config.store_timeout,
            "register identity",
            self.identities.register(principal.clone(), identity.clone()),
        )
        .await?;

        metrics::counter!("medid_identities_registered_total", "role" => request.role.as_str())
            .increment(1);
        info!(
            principal_id = %principal.id,
            did = %principal.did_identifier,
            role = %principal.role,
            keys = self.generator.strategy_name(),
            "principal registered"
        );

        self.notifier.notify(NotificationEvent {
            recipient: principal.id,
            kind: NotificationKind::Info,
            title: "Welcome".into(),
            message: format!("Your decentralized identifier {} is ready", principal.did_identifier),
            metadata: None,
        });

        Ok(Registered {
            principal,
            did: identity.public_profile(),
        })
    }

    /// Look up the principal that owns `did`.
    pub async fn login_with_did(&self, did: &str) -> Result<Registered, ServiceError> {
        let did = Did::new(did.trim()).map_err(|e| ServiceError::Validation(e.to_string()))?;
        let principal = within(
            self.config.store_timeout,
            "principal lookup",
            self.identities.principal_by_did(&did),
        )
        .await?;
        let did = self.did_profile_of(&principal.did_identifier).await?;
        Ok(Registered { principal, did })
    }

    /// The authenticated principal and its DID view.
    pub async fn whoami(&self, id: PrincipalId) -> Result<Registered, ServiceError> {
        let principal = self.principal(id).await?;
        let did = self.did_profile_of(&principal.did_identifier).await?;
        Ok(Registered { principal, did })
    }

    pub async fn principal(&self, id: PrincipalId) -> Result<Principal, ServiceError> {
        within(self.config.store_timeout, "principal lookup", self.identities.principal(id)).await
    }

    /// Public DID view. Never carries private key material.
    pub async fn did_profile(&self, did: &str) -> Result<PublicDidProfile, ServiceError> {
        let did = Did::new(did).map_err(|e| ServiceError::Validation(e.to_string()))?;
        self.did_profile_of(&did).await
    }

    async fn did_profile_of(&self, did: &Did) -> Result<PublicDidProfile, ServiceError> {
        let limit = self.config.store_timeout;
        let identity = within(limit, "identity lookup", self.identities.identity(did)).await?;
        Ok(identity.public_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{patient, service, RecordingNotifier};
    use crate::{ProofMode, ServiceConfig};
    use medid_did::HEALTHCARE_SERVICE_TYPE;
    use std::sync::Arc;

    #[tokio::test]
    async fn registration_builds_document_with_healthcare_service() {
        let svc = service();
        let reg = patient(&svc, "Jane", "Doe").await;

        assert_eq!(reg.principal.role, Role::Patient);
        let id = reg.principal.did_identifier.method_specific_id();
        assert!(id.starts_with("patientjanedoe"), "{id}");

        let doc = &reg.did.did_document;
        assert_eq!(doc.service.len(), 1);
        assert_eq!(doc.service[0].service_type, HEALTHCARE_SERVICE_TYPE);
        assert_eq!(doc.service[0].service_endpoint, "https://healthcare.example.com");
        assert_eq!(doc.service[0].id, format!("{}#healthcare-service", doc.id));
    }

    #[tokio::test]
    async fn admin_role_is_not_self_service() {
        let svc = service();
        let err = svc
            .register(Registration {
                role: Role::Admin,
                first_name: "Root".into(),
                last_name: "".into(),
                email: "root@example.com".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let admin = svc.register_admin("Root", "", "root@example.com").await.unwrap();
        assert_eq!(admin.principal.role, Role::Admin);
    }

    #[tokio::test]
    async fn invalid_fields_are_rejected() {
        let svc = service();
        let cases = [
            ("", "a@example.com"),
            ("Jane", "no-at-sign"),
            ("Jane", "a b@example.com"),
        ];
        for (first, email) in cases {
            let err = svc
                .register(Registration {
                    role: Role::Patient,
                    first_name: first.into(),
                    last_name: "Doe".into(),
                    email: email.into(),
                })
                .await
                .unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR", "{first:?} {email:?}");
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let svc = service();
        patient(&svc, "Jane", "Doe").await;
        let err = svc
            .register(Registration {
                role: Role::Doctor,
                first_name: "Other".into(),
                last_name: "Person".into(),
                email: "JANE.DOE@example.com".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DUPLICATE");
    }

    #[tokio::test]
    async fn login_and_whoami_resolve_the_same_principal() {
        let svc = service();
        let reg = patient(&svc, "Jane", "Doe").await;

        let login = svc.login_with_did(reg.principal.did_identifier.as_str()).await.unwrap();
        assert_eq!(login, reg);
        assert_eq!(svc.whoami(reg.principal.id).await.unwrap(), reg);

        let unknown = svc.login_with_did("did:example:nobody").await.unwrap_err();
        assert_eq!(unknown.code(), "NOT_FOUND");
        let bad = svc.login_with_did("not-a-did").await.unwrap_err();
        assert_eq!(bad.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn welcome_notification_is_emitted() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = MedidService::in_memory(ServiceConfig::default(), notifier.clone());
        let reg = patient(&svc, "Jane", "Doe").await;

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].recipient, reg.principal.id);
        assert_eq!(events[0].kind, NotificationKind::Info);
    }

    #[tokio::test]
    async fn public_profile_never_carries_private_keys() {
        let config = ServiceConfig {
            proof_mode: ProofMode::Ed25519,
            ..ServiceConfig::default()
        };
        let svc = MedidService::in_memory(config, Arc::new(crate::NullNotifier));
        let reg = patient(&svc, "Jane", "Doe").await;

        let profile = svc.did_profile(reg.principal.did_identifier.as_str()).await.unwrap();
        assert!(profile.public_key.starts_with("ed25519:"));
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.to_lowercase().contains("private"));
    }
}
