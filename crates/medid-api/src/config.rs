//! # Server Configuration
//!
//! Every flag can also be set through its environment variable.

use std::time::Duration;

use clap::Parser;
use medid_service::{ProofMode, ServiceConfig};

use crate::auth::AuthConfig;

/// medid API server.
#[derive(Parser, Debug, Clone)]
#[command(name = "medid-api", version, about)]
pub struct Config {
    /// Listen port.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Shared bearer secret. Without it any known principal id is accepted.
    #[arg(long, env = "MEDID_AUTH_SECRET", hide_env_values = true)]
    pub auth_secret: Option<String>,

    /// How credential proofs are produced: `placeholder` or `ed25519`.
    #[arg(long, env = "MEDID_PROOF_MODE", default_value_t = ProofMode::Placeholder)]
    pub proof_mode: ProofMode,

    /// Upper bound on each store call, in milliseconds.
    #[arg(long, env = "MEDID_STORE_TIMEOUT_MS", default_value_t = 2000)]
    pub store_timeout_ms: u64,

    /// Largest credential accepted for verification, in bytes.
    #[arg(long, env = "MEDID_MAX_VERIFY_BYTES", default_value_t = 64 * 1024)]
    pub max_verify_bytes: usize,

    /// Capacity of the notification channel.
    #[arg(long, env = "MEDID_NOTIFICATION_BUFFER", default_value_t = 1024)]
    pub notification_buffer: usize,

    /// Emit logs as JSON lines.
    #[arg(long, env = "MEDID_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            store_timeout: Duration::from_millis(self.store_timeout_ms),
            max_verify_bytes: self.max_verify_bytes,
            proof_mode: self.proof_mode,
            ..ServiceConfig::default()
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(self.auth_secret.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["medid-api"]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.proof_mode, ProofMode::Placeholder);
        assert!(!config.log_json);

        let service = config.service_config();
        assert_eq!(service.store_timeout, Duration::from_secs(2));
        assert_eq!(service.max_verify_bytes, 65536);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from([
            "medid-api",
            "--port",
            "9000",
            "--proof-mode",
            "ed25519",
            "--store-timeout-ms",
            "250",
            "--auth-secret",
            "s3cret",
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.proof_mode, ProofMode::Ed25519);
        assert_eq!(config.service_config().store_timeout, Duration::from_millis(250));
        assert!(config.auth_config().is_enforced());
    }

    #[test]
    fn unknown_proof_mode_is_rejected() {
        assert!(Config::try_parse_from(["medid-api", "--proof-mode", "rsa"]).is_err());
    }
}
