use medid_core::{Did, PrincipalId, Role, Timestamp};
use serde::Serialize;

/// A registered portal user. Exactly one DID identity per principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
    pub did_identifier: Did,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: Timestamp,
}

impl Principal {
    /// `"first last"`, trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}
