//! # Issuance Service
//!
//! `issue_to_patient` checks roles, builds and signs the credential, and
//! saves it. The save completes (or fails) before the call returns, so a
//! returned record can always be looked up by id. The subject is notified
//! afterwards on a best-effort basis.

use std::collections::BTreeMap;

use medid_core::{Did, Timestamp};
use medid_store::{Principal, StoredCredential};
use medid_vc::{claims_from_value, sample_claims, Claims, CredentialKind, IssueRequest};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::deadline::within;
use crate::error::ServiceError;
use crate::notify::{NotificationEvent, NotificationKind};
use crate::MedidService;

/// Patient name used by the sample-claims preview.
pub const SAMPLE_PATIENT_NAME: &str = "John Doe";

/// Issuance input as received from a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueCredential {
    pub subject_did: String,
    pub credential_type: String,
    /// `None` or `null` selects the sample claims for the type.
    pub claims: Option<Value>,
}

/// The persisted record plus the full document for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCredential {
    pub record: StoredCredential,
    pub vc_document: Value,
}

impl MedidService {
    pub async fn issue_to_patient(
        &self,
        issuer: &Principal,
        request: IssueCredential,
    ) -> Result<IssuedCredential, ServiceError> {
        self.issue_to_patient_at(issuer, request, Timestamp::now()).await
    }

    /// Issue with an explicit `issuanceDate`, for backdated imports.
    pub async fn issue_to_patient_at(
        &self,
        issuer: &Principal,
        request: IssueCredential,
        issued_at: Timestamp,
    ) -> Result<IssuedCredential, ServiceError> {
        if !issuer.role.can_issue() {
            return Err(ServiceError::Forbidden(format!(
                "role {} cannot issue credentials",
                issuer.role
            )));
        }
        let kind: CredentialKind = request.credential_type.parse()?;
        let claims = claims_from_value(request.claims)?;
        let subject = Did::new(request.subject_did.trim())
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let limit = self.config.store_timeout;
        let issuer_identity = self.identities.identity(&issuer.did_identifier);
        within(limit, "issuer identity lookup", issuer_identity).await?;
        let patient = within(limit, "subject lookup", self.identities.principal_by_did(&subject))
            .await
            .map_err(|e| match e {
                ServiceError::NotFound(_) => ServiceError::NotFound(format!("patient {subject}")),
                other => other,
            })?;
        if !patient.role.can_hold() {
            return Err(ServiceError::NotFound(format!("patient {subject}")));
        }

        let credential = self.factory.issue_at(
            IssueRequest {
                issuer: issuer.did_identifier.clone(),
                subject,
                kind: kind.clone(),
                claims,
                subject_name: Some(patient.display_name()),
            },
            issued_at,
        )?;
        let vc_document = credential.to_document()?;
        let record = within(limit, "save credential", self.credentials.save(credential)).await?;

        metrics::counter!("medid_credentials_issued_total", "type" => kind.as_str().to_string())
            .increment(1);
        info!(
            credential_id = %record.id,
            issuer = %record.issuer_did,
            subject = %record.subject_did,
            credential_type = %kind,
            "credential issued"
        );

        self.notifier.notify(NotificationEvent {
            recipient: patient.id,
            kind: NotificationKind::Success,
            title: "New Credential Issued".into(),
            message: format!(
                "You have received a new {} credential",
                kind.as_str().trim_end_matches("Credential")
            ),
            metadata: Some(json!({
                "credentialId": record.id,
                "credentialType": kind.as_str(),
            })),
        });

        Ok(IssuedCredential {
            record,
            vc_document,
        })
    }
}

/// Sample claims for every kind that has a generator, keyed by type name.
pub fn sample_preview(at: Timestamp) -> BTreeMap<String, Claims> {
    CredentialKind::WITH_SAMPLES
        .iter()
        .filter_map(|kind| {
            sample_claims(kind, Some(SAMPLE_PATIENT_NAME), at)
                .map(|c| (kind.as_str().to_string(), c))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{doctor, patient, service, RecordingNotifier};
    use crate::ServiceConfig;
    use medid_vc::kind::VC_BASE_TYPE;
    use medid_vc::CredentialStatus;
    use std::sync::Arc;

    fn request(subject: &Did, kind: &str, claims: Option<Value>) -> IssueCredential {
        IssueCredential {
            subject_did: subject.to_string(),
            credential_type: kind.into(),
            claims,
        }
    }

    #[tokio::test]
    async fn doctor_issues_vaccination_with_sample_claims() {
        let svc = service();
        let doc = doctor(&svc, "Greg", "House").await;
        let pat = patient(&svc, "Jane", "Doe").await;

        let issued = svc
            .issue_to_patient(
                &doc.principal,
                request(&pat.principal.did_identifier, "VaccinationCredential", None),
            )
            .await
            .unwrap();

        assert_eq!(issued.record.credential_type, CredentialKind::Vaccination);
        assert_eq!(issued.record.issuer_did, doc.principal.did_identifier);
        assert_eq!(issued.record.status, CredentialStatus::Active);
        assert!(issued.record.expiration_date.is_some());
        assert_eq!(issued.record.vc_data, issued.vc_document);

        let subject = &issued.vc_document["credentialSubject"];
        assert_eq!(subject["id"], pat.principal.did_identifier.as_str());
        assert_eq!(subject["vaccineName"], "COVID-19 mRNA Vaccine");
        assert_eq!(subject["patientName"], "Jane Doe");
        assert_eq!(issued.vc_document["type"][0], VC_BASE_TYPE);
    }

    #[tokio::test]
    async fn patient_cannot_issue() {
        let svc = service();
        let pat = patient(&svc, "Jane", "Doe").await;
        let err = svc
            .issue_to_patient(
                &pat.principal,
                request(&pat.principal.did_identifier, "BloodTestCredential", None),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn subject_must_be_a_known_patient() {
        let svc = service();
        let doc = doctor(&svc, "Greg", "House").await;
        let other = doctor(&svc, "James", "Wilson").await;

        let unknown = Did::new("did:example:patientghost00000000").unwrap();
        let err = svc
            .issue_to_patient(&doc.principal, request(&unknown, "BloodTestCredential", None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");

        let err = svc
            .issue_to_patient(
                &doc.principal,
                request(&other.principal.did_identifier, "BloodTestCredential", None),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn bad_type_and_claims_are_rejected() {
        let svc = service();
        let doc = doctor(&svc, "Greg", "House").await;
        let pat = patient(&svc, "Jane", "Doe").await;
        let did = &pat.principal.did_identifier;

        let err = svc
            .issue_to_patient(&doc.principal, request(did, "not a type", None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_TYPE");

        let err = svc
            .issue_to_patient(&doc.principal, request(did, "BloodTestCredential", Some(json!([1]))))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let err = svc
            .issue_to_patient(
                &doc.principal,
                request(did, "BloodTestCredential", Some(json!({"id": "did:example:x"}))),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn open_kinds_issue_with_custom_claims() {
        let svc = service();
        let doc = doctor(&svc, "Greg", "House").await;
        let pat = patient(&svc, "Jane", "Doe").await;

        let issued = svc
            .issue_to_patient(
                &doc.principal,
                request(
                    &pat.principal.did_identifier,
                    "AllergyCredential",
                    Some(json!({"allergen": "penicillin"})),
                ),
            )
            .await
            .unwrap();
        assert_eq!(
            issued.record.credential_type,
            CredentialKind::Other("AllergyCredential".into())
        );
        assert_eq!(issued.vc_document["credentialSubject"]["allergen"], "penicillin");
        assert!(issued.record.expiration_date.is_none());
    }

    #[tokio::test]
    async fn identical_reissue_is_duplicate() {
        let svc = service();
        let doc = doctor(&svc, "Greg", "House").await;
        let pat = patient(&svc, "Jane", "Doe").await;
        let at = Timestamp::parse("2026-05-01T12:00:00Z").unwrap();
        let req = request(&pat.principal.did_identifier, "BloodTestCredential", None);

        svc.issue_to_patient_at(&doc.principal, req.clone(), at).await.unwrap();
        let err = svc
            .issue_to_patient_at(&doc.principal, req, at)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DUPLICATE");
    }

    #[tokio::test]
    async fn subject_is_notified() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = MedidService::in_memory(ServiceConfig::default(), notifier.clone());
        let doc = doctor(&svc, "Greg", "House").await;
        let pat = patient(&svc, "Jane", "Doe").await;

        let issued = svc
            .issue_to_patient(
                &doc.principal,
                request(&pat.principal.did_identifier, "AppointmentCredential", None),
            )
            .await
            .unwrap();

        let last = notifier.events().pop().unwrap();
        assert_eq!(last.recipient, pat.principal.id);
        assert_eq!(last.kind, NotificationKind::Success);
        assert_eq!(last.message, "You have received a new Appointment credential");
        assert_eq!(
            last.metadata.unwrap()["credentialId"],
            issued.record.id.to_string()
        );
    }

    #[test]
    fn sample_preview_covers_generated_kinds() {
        let preview = sample_preview(Timestamp::parse("2026-01-01T00:00:00Z").unwrap());
        assert_eq!(preview.len(), 4);
        assert!(preview.contains_key("VaccinationCredential"));
        assert!(!preview.contains_key("PrescriptionCredential"));
        assert_eq!(preview["BloodTestCredential"]["patientName"], SAMPLE_PATIENT_NAME);
    }
}
