//! Credential listings, lookup and revocation.
//!
//! Every record read here is paired with its effective status at read time.
//! `Expired` is never stored, so the same record can be `active` on one read
//! and `expired` on the next.

use medid_core::{CredentialId, Role, Timestamp};
use medid_store::{Principal, Revoked, StoredCredential};
use medid_vc::EffectiveStatus;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::deadline::within;
use crate::error::ServiceError;
use crate::notify::{NotificationEvent, NotificationKind};
use crate::MedidService;

/// A stored record as returned to readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialView {
    #[serde(flatten)]
    pub record: StoredCredential,
    pub effective_status: EffectiveStatus,
}

impl CredentialView {
    pub fn at(record: StoredCredential, now: Timestamp) -> Self {
        let effective_status = record.effective_status(now);
        Self {
            record,
            effective_status,
        }
    }
}

/// Result of a revoke call. `changed` is false when it was already revoked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Revocation {
    pub credential: CredentialView,
    pub changed: bool,
}

impl MedidService {
    /// Credentials held by a patient or issued by a doctor, newest first.
    /// Admins have no list of their own.
    pub async fn credentials_for(
        &self,
        principal: &Principal,
    ) -> Result<Vec<CredentialView>, ServiceError> {
        let limit = self.config.store_timeout;
        let did = &principal.did_identifier;
        let records = match principal.role {
            Role::Patient => {
                within(limit, "list by subject", self.credentials.find_by_subject(did)).await?
            }
            Role::Doctor => {
                within(limit, "list by issuer", self.credentials.find_by_issuer(did)).await?
            }
            Role::Admin => Vec::new(),
        };
        let now = Timestamp::now();
        Ok(records.into_iter().map(|r| CredentialView::at(r, now)).collect())
    }

    /// One record, visible to its subject, its issuer, and admins.
    pub async fn credential_by_id(
        &self,
        principal: &Principal,
        id: CredentialId,
    ) -> Result<CredentialView, ServiceError> {
        let record = within(
            self.config.store_timeout,
            "credential lookup",
            self.credentials.find_by_id(id),
        )
        .await?;
        let did = &principal.did_identifier;
        let visible = principal.role == Role::Admin
            || &record.subject_did == did
            || &record.issuer_did == did;
        if !visible {
            return Err(ServiceError::Forbidden(format!(
                "credential {id} belongs to another principal"
            )));
        }
        Ok(CredentialView::at(record, Timestamp::now()))
    }

    /// Revoke a credential. Only its issuer may do so. Idempotent.
    pub async fn revoke(
        &self,
        principal: &Principal,
        id: CredentialId,
    ) -> Result<Revocation, ServiceError> {
        if !principal.role.can_issue() {
            return Err(ServiceError::Forbidden(format!(
                "role {} cannot revoke credentials",
                principal.role
            )));
        }
        let Revoked { record, changed } = within(
            self.config.store_timeout,
            "revoke credential",
            self.credentials.revoke(id, &principal.did_identifier),
        )
        .await?;

        if changed {
            metrics::counter!("medid_credentials_revoked_total").increment(1);
            info!(
                credential_id = %id,
                subject = %record.subject_did,
                credential_type = %record.credential_type,
                "revocation recorded"
            );
            self.notify_revoked(&record).await;
        } else {
            debug!(credential_id = %id, "credential already revoked");
        }

        Ok(Revocation {
            credential: CredentialView::at(record, Timestamp::now()),
            changed,
        })
    }

    async fn notify_revoked(&self, record: &StoredCredential) {
        let holder = within(
            self.config.store_timeout,
            "subject lookup",
            self.identities.principal_by_did(&record.subject_did),
        )
        .await;
        let Ok(holder) = holder else {
            debug!(subject = %record.subject_did, "revoked credential has no registered holder");
            return;
        };
        self.notifier.notify(NotificationEvent {
            recipient: holder.id,
            kind: NotificationKind::Warning,
            title: "Credential Revoked".into(),
            message: format!(
                "Your {} credential has been revoked by the issuer",
                record.credential_type.as_str().trim_end_matches("Credential")
            ),
            metadata: Some(json!({
                "credentialId": record.id,
                "credentialType": record.credential_type.as_str(),
            })),
        });
    }
}
