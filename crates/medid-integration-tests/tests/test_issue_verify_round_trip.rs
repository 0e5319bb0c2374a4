//! Issue then verify: a freshly issued credential verifies as valid, for
//! every known kind, for open kinds, with sample or custom claims, under
//! both proof modes.

mod common;

use common::{doctor_and_patient, ed25519_service, issue, placeholder_service, request};
use medid_service::MedidService;
use medid_vc::{CredentialKind, RawCredential};
use proptest::prelude::*;
use serde_json::{Map, Value};

const KINDS: [&str; 6] = [
    "HealthCheckupCredential",
    "BloodTestCredential",
    "VaccinationCredential",
    "AppointmentCredential",
    "PrescriptionCredential",
    "GeneticScreeningCredential",
];

async fn assert_round_trip(svc: &MedidService) {
    let (doctor, patient) = doctor_and_patient(svc).await;
    for kind in KINDS {
        let issued = issue(svc, &doctor, &patient, kind).await;
        let report = svc
            .verify(RawCredential::Document(issued.vc_document))
            .await
            .unwrap();
        assert!(report.is_valid, "{kind}: {report:?}");
        assert_eq!(report.credential_type, kind);
        assert_eq!(report.issuer, doctor.principal.did_identifier.as_str());
        assert_eq!(report.subject, patient.principal.did_identifier.as_str());
    }
}

#[tokio::test]
async fn placeholder_mode_round_trip() {
    assert_round_trip(&placeholder_service()).await;
}

#[tokio::test]
async fn ed25519_mode_round_trip() {
    assert_round_trip(&ed25519_service()).await;
}

#[tokio::test]
async fn issue_then_list_vaccination_with_sample_claims() {
    let svc = placeholder_service();
    let (doctor, patient) = doctor_and_patient(&svc).await;
    let issued = issue(&svc, &doctor, &patient, "VaccinationCredential").await;

    let subject = &issued.vc_document["credentialSubject"];
    for field in ["vaccineName", "manufacturer", "batchNumber"] {
        assert!(subject[field].is_string(), "{field} missing");
    }

    let listed = svc.credentials_for(&patient.principal).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].record.credential_type, CredentialKind::Vaccination);
    assert_eq!(listed[0].record.issuer_did, doctor.principal.did_identifier);
}

#[tokio::test]
async fn pretty_printed_text_still_matches_the_ledger() {
    let svc = placeholder_service();
    let (doctor, patient) = doctor_and_patient(&svc).await;
    let issued = issue(&svc, &doctor, &patient, "BloodTestCredential").await;

    let text = serde_json::to_string_pretty(&issued.vc_document).unwrap();
    let report = svc.verify(RawCredential::Text(text)).await.unwrap();
    assert!(report.exists_in_store);
    assert!(report.is_valid);
}

fn claim_map() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z][a-zA-Z]{0,12}", "[ -~]{0,24}", 1..6).prop_map(|m| {
        m.into_iter()
            .filter(|(k, _)| k != "id")
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_custom_claims_round_trip(
        claims in claim_map(),
        kind_idx in 0usize..KINDS.len(),
        ed25519 in any::<bool>(),
    ) {
        prop_assume!(!claims.is_empty());
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let report = rt.block_on(async {
            let svc = if ed25519 { ed25519_service() } else { placeholder_service() };
            let (doctor, patient) = doctor_and_patient(&svc).await;
            let issued = svc
                .issue_to_patient(
                    &doctor.principal,
                    request(&patient, KINDS[kind_idx], Some(Value::Object(claims.clone()))),
                )
                .await
                .unwrap();
            for (k, v) in &claims {
                assert_eq!(&issued.vc_document["credentialSubject"][k], v);
            }
            svc.verify(RawCredential::Document(issued.vc_document)).await.unwrap()
        });
        prop_assert!(report.is_valid, "{:?}", report);
    }
}
