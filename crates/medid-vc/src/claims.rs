//! Sample claim sets used when a credential is issued without custom claims.
//!
//! Output depends only on the kind, the patient name and the issuance
//! instant, so the same inputs always produce the same claims.

use medid_core::Timestamp;
use serde_json::{json, Map, Value};

use crate::error::VcError;
use crate::kind::CredentialKind;

/// Claims placed under `credentialSubject`, alongside `id`.
pub type Claims = Map<String, Value>;

/// Claims from optional request JSON. `None` and `null` mean no custom claims.
pub fn claims_from_value(value: Option<Value>) -> Result<Claims, VcError> {
    match value {
        None | Some(Value::Null) => Ok(Claims::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(VcError::ClaimsNotObject),
    }
}

/// Default claims for `kind`, or `None` if the kind has no generator.
///
/// `PrescriptionCredential` is known but has no generator; callers fall back
/// to an empty claim set for it and for every [`CredentialKind::Other`].
pub fn sample_claims(
    kind: &CredentialKind,
    patient_name: Option<&str>,
    at: Timestamp,
) -> Option<Claims> {
    let today = at.date_string();
    let body = match kind {
        CredentialKind::HealthCheckup => json!({
            "checkupDate": today,
            "bloodPressure": "120/80 mmHg",
            "heartRate": "72 bpm",
            "weight": "70 kg",
            "height": "175 cm",
            "summary": "Normal vital signs. Patient is in good health.",
            "recommendations": ["Continue regular exercise", "Maintain balanced diet"]
        }),
        CredentialKind::BloodTest => json!({
            "testDate": today,
            "testType": "Complete Blood Count",
            "results": {
                "hemoglobin": "14.5 g/dL",
                "whiteBloodCells": "6800/μL",
                "platelets": "250,000/μL",
                "glucose": "95 mg/dL"
            },
            "status": "Normal",
            "labTechnician": "Lab Tech ID: LT-123"
        }),
        CredentialKind::Vaccination => json!({
            "vaccineName": "COVID-19 mRNA Vaccine",
            "manufacturer": "Pfizer-BioNTech",
            "batchNumber": "ABC123",
            "vaccinationDate": today,
            "doseNumber": 1,
            "nextDueDate": at.plus_days(21).date_string(),
            "administeredBy": "Dr. Jane Smith",
            "location": "City Health Center"
        }),
        CredentialKind::Appointment => json!({
            "appointmentDate": at.plus_days(7).to_iso8601(),
            "appointmentType": "Follow-up Consultation",
            "duration": "30 minutes",
            "location": "Medical Center, Room 205",
            "purpose": "Review recent test results and discuss treatment plan",
            "instructions": "Please bring previous medical records"
        }),
        CredentialKind::Prescription | CredentialKind::Other(_) => return None,
    };

    let Value::Object(mut claims) = body else {
        return None;
    };
    if let Some(name) = patient_name {
        claims.insert("patientName".into(), Value::String(name.to_string()));
    }
    Some(claims)
}
