//! Principal roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The role a principal plays in the portal. A principal's role decides
/// whether it may issue credentials (doctor) or receive them (patient).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Admin => "admin",
        }
    }

    /// Whether this role may act as a credential issuer.
    pub fn can_issue(&self) -> bool {
        matches!(self, Self::Doctor)
    }

    /// Whether this role may be the subject of a credential.
    pub fn can_hold(&self) -> bool {
        matches!(self, Self::Patient)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            "admin" => Ok(Self::Admin),
            _ => Err(ValidationError::InvalidRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_doctors_issue() {
        assert!(Role::Doctor.can_issue());
        assert!(!Role::Patient.can_issue());
        assert!(!Role::Admin.can_issue());
        assert!(Role::Patient.can_hold());
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("Doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("nurse".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Patient).unwrap(), "\"patient\"");
    }
}
