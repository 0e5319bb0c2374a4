//! # Credential lifecycle
//!
//! ```text
//! Issued ──▶ Active ──▶ Revoked (terminal, stored)
//!               │
//!               └─────▶ Expired (derived per read, never stored)
//! ```
//!
//! Only `Active` and `Revoked` are ever stored. `Expired` is computed from
//! `expirationDate` at query time, and an expired credential can still be
//! revoked.

use std::fmt;

use medid_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Authoritative, stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Active,
    Revoked,
}

impl CredentialStatus {
    /// Apply a revocation. Returns the new state and whether it changed.
    /// Revoking a revoked credential is a no-op.
    pub fn revoke(self) -> (Self, bool) {
        match self {
            Self::Active => (Self::Revoked, true),
            Self::Revoked => (Self::Revoked, false),
        }
    }

    /// The status a reader observes at `now`.
    pub fn effective(self, expiration: Option<Timestamp>, now: Timestamp) -> EffectiveStatus {
        match self {
            Self::Revoked => EffectiveStatus::Revoked,
            Self::Active if expiration.is_some_and(|exp| exp <= now) => EffectiveStatus::Expired,
            Self::Active => EffectiveStatus::Active,
        }
    }
}

/// Status as reported to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    Active,
    Revoked,
    Expired,
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        })
    }
}
