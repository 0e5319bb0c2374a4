//! # Credential kinds
//!
//! The portal knows five healthcare credential types. Any other well-formed
//! type name (`^[A-Z][A-Za-z0-9]*Credential$`) is accepted as
//! [`CredentialKind::Other`] with no default claims and no validity window.

use std::fmt;
use std::str::FromStr;

use medid_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::VcError;

/// Base type every credential carries alongside its kind.
pub const VC_BASE_TYPE: &str = "VerifiableCredential";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CredentialKind {
    HealthCheckup,
    BloodTest,
    Vaccination,
    Appointment,
    Prescription,
    Other(String),
}

/// How long a credential of a given kind stays valid after issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityPolicy {
    Years(u32),
}

impl ValidityPolicy {
    pub fn expiration_from(&self, issued: Timestamp) -> Timestamp {
        match self {
            Self::Years(n) => issued.plus_years(*n),
        }
    }
}

impl CredentialKind {
    /// Kinds with built-in sample claims, in display order.
    pub const WITH_SAMPLES: [CredentialKind; 4] = [
        Self::HealthCheckup,
        Self::BloodTest,
        Self::Vaccination,
        Self::Appointment,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::HealthCheckup => "HealthCheckupCredential",
            Self::BloodTest => "BloodTestCredential",
            Self::Vaccination => "VaccinationCredential",
            Self::Appointment => "AppointmentCredential",
            Self::Prescription => "PrescriptionCredential",
            Self::Other(name) => name,
        }
    }

    pub fn validity(&self) -> Option<ValidityPolicy> {
        match self {
            Self::Vaccination => Some(ValidityPolicy::Years(5)),
            _ => None,
        }
    }

    /// The VC `type` array for this kind.
    pub fn type_array(&self) -> Vec<String> {
        vec![VC_BASE_TYPE.to_string(), self.as_str().to_string()]
    }
}

impl FromStr for CredentialKind {
    type Err = VcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "HealthCheckupCredential" => Self::HealthCheckup,
            "BloodTestCredential" => Self::BloodTest,
            "VaccinationCredential" => Self::Vaccination,
            "AppointmentCredential" => Self::Appointment,
            "PrescriptionCredential" => Self::Prescription,
            other if is_well_formed(other) => Self::Other(other.to_string()),
            other => return Err(VcError::InvalidType(other.to_string())),
        })
    }
}

impl TryFrom<String> for CredentialKind {
    type Error = VcError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CredentialKind> for String {
    fn from(k: CredentialKind) -> Self {
        k.as_str().to_string()
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_well_formed(name: &str) -> bool {
    const SUFFIX: &str = "Credential";
    if name == VC_BASE_TYPE || name.len() <= SUFFIX.len() || name.len() > 64 {
        return false;
    }
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
        && name.ends_with(SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_kinds_parse() {
        for kind in [
            CredentialKind::HealthCheckup,
            CredentialKind::BloodTest,
            CredentialKind::Vaccination,
            CredentialKind::Appointment,
            CredentialKind::Prescription,
        ] {
            assert_eq!(kind.as_str().parse::<CredentialKind>().unwrap(), kind);
            assert!(!matches!(kind, CredentialKind::Other(_)));
        }
    }

    #[test]
    fn open_enum_accepts_well_formed_names() {
        let kind: CredentialKind = "AllergyCredential".parse().unwrap();
        assert_eq!(kind, CredentialKind::Other("AllergyCredential".into()));
        assert!(kind.validity().is_none());
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in [
            "",
            "Credential",
            "VerifiableCredential",
            "vaccinationCredential",
            "Vaccination",
            "Bad Credential",
            "X-RayCredential",
        ] {
            assert!(
                matches!(bad.parse::<CredentialKind>(), Err(VcError::InvalidType(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn only_vaccination_has_validity_window() {
        assert_eq!(CredentialKind::Vaccination.validity(), Some(ValidityPolicy::Years(5)));
        assert!(CredentialKind::BloodTest.validity().is_none());
        assert!(CredentialKind::Prescription.validity().is_none());
    }

    #[test]
    fn five_year_window() {
        let issued = Timestamp::parse("2026-04-01T09:00:00Z").unwrap();
        let exp = ValidityPolicy::Years(5).expiration_from(issued);
        assert_eq!(exp.to_iso8601(), "2031-04-01T09:00:00Z");
    }

    #[test]
    fn type_array_and_serde() {
        assert_eq!(
            CredentialKind::Vaccination.type_array(),
            vec!["VerifiableCredential", "VaccinationCredential"]
        );
        let json = serde_json::to_string(&CredentialKind::BloodTest).unwrap();
        assert_eq!(json, "\"BloodTestCredential\"");
        assert!(serde_json::from_str::<CredentialKind>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn well_formed_names_round_trip(name in "[A-Z][A-Za-z0-9]{0,40}Credential") {
            prop_assume!(name != VC_BASE_TYPE);
            let kind: CredentialKind = name.parse().unwrap();
            prop_assert_eq!(kind.as_str(), name.as_str());
        }
    }
}
