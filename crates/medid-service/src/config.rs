use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use medid_vc::verifier::DEFAULT_MAX_PAYLOAD_BYTES;

/// Endpoint advertised in every new DID document's `HealthcareService`.
pub const DEFAULT_HEALTHCARE_ENDPOINT: &str = "https://healthcare.example.com";

/// How credential proofs are produced and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProofMode {
    /// Content-bound digest, no keys involved.
    #[default]
    Placeholder,
    /// Ed25519 signatures with server-held issuer keys.
    Ed25519,
}

impl ProofMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Ed25519 => "ed25519",
        }
    }

    /// Whether the server must keep issuers' private keys to sign for them.
    pub fn holds_private_keys(&self) -> bool {
        matches!(self, Self::Ed25519)
    }
}

impl fmt::Display for ProofMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProofMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(format!("unknown proof mode: {other}")),
        }
    }
}

/// Tunables for [`crate::MedidService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Upper bound on every store call.
    pub store_timeout: Duration,
    /// Largest verification payload accepted, in bytes.
    pub max_verify_bytes: usize,
    pub healthcare_endpoint: String,
    pub proof_mode: ProofMode,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(2000),
            max_verify_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            healthcare_endpoint: DEFAULT_HEALTHCARE_ENDPOINT.to_string(),
            proof_mode: ProofMode::Placeholder,
        }
    }
}
