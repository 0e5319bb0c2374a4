//! Shared fixtures for the cross-crate tests.

#![allow(dead_code)]

use std::sync::Arc;

use medid_core::{Role, Timestamp};
use medid_service::{
    IssueCredential, IssuedCredential, MedidService, NullNotifier, ProofMode, Registered,
    Registration, ServiceConfig,
};
use serde_json::Value;

pub fn placeholder_service() -> MedidService {
    MedidService::in_memory(ServiceConfig::default(), Arc::new(NullNotifier))
}

pub fn ed25519_service() -> MedidService {
    let config = ServiceConfig {
        proof_mode: ProofMode::Ed25519,
        ..ServiceConfig::default()
    };
    MedidService::in_memory(config, Arc::new(NullNotifier))
}

pub async fn enroll(svc: &MedidService, role: Role, first: &str, last: &str) -> Registered {
    svc.register(Registration {
        role,
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{first}.{last}@example.com").to_lowercase(),
    })
    .await
    .unwrap()
}

/// A doctor and a patient registered with `svc`.
pub async fn doctor_and_patient(svc: &MedidService) -> (Registered, Registered) {
    let doctor = enroll(svc, Role::Doctor, "Greg", "House").await;
    let patient = enroll(svc, Role::Patient, "Jane", "Doe").await;
    (doctor, patient)
}

pub fn request(patient: &Registered, kind: &str, claims: Option<Value>) -> IssueCredential {
    IssueCredential {
        subject_did: patient.principal.did_identifier.to_string(),
        credential_type: kind.into(),
        claims,
    }
}

pub async fn issue(
    svc: &MedidService,
    doctor: &Registered,
    patient: &Registered,
    kind: &str,
) -> IssuedCredential {
    svc.issue_to_patient(&doctor.principal, request(patient, kind, None))
        .await
        .unwrap()
}

pub async fn issue_at(
    svc: &MedidService,
    doctor: &Registered,
    patient: &Registered,
    kind: &str,
    at: Timestamp,
) -> IssuedCredential {
    svc.issue_to_patient_at(&doctor.principal, request(patient, kind, None), at)
        .await
        .unwrap()
}
