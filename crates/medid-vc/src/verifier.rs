//! # Credential Verifier
//!
//! Verification input is untrusted: a JSON string or an already-parsed JSON
//! value, of bounded size. Anything that cannot be read as a credential is
//! rejected with [`VcError::Malformed`] before any check runs.
//!
//! Once parsed, the signature check and the expiry check always both run, and
//! the ledger result is supplied by the caller, so the report can say
//! "signature ok, but expired" as distinctly as "signature bad". A ledger that
//! could not be read still yields a report, with `ledgerError` set.
//!
//! `isValid = signatureValid && !expired && existsInStore && !revoked`

use std::sync::Arc;

use medid_core::Timestamp;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::credential::{VerifiableCredential, VC_CONTEXT};
use crate::error::VcError;
use crate::signer::SignatureChecker;

/// Default cap on verification input size.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// Verification input as received.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCredential {
    /// JSON text still to be parsed.
    Text(String),
    Document(Value),
}

/// A credential that parsed, with the exact document it was read from.
#[derive(Debug, Clone)]
pub struct ParsedCredential {
    pub document: Value,
    pub credential: VerifiableCredential,
}

/// Outcome of the signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureVerdict {
    pub valid: bool,
    pub reason: Option<String>,
}

impl SignatureVerdict {
    fn ok() -> Self {
        Self { valid: true, reason: None }
    }

    fn failed(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

impl Serialize for SignatureVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if self.valid { "valid" } else { "invalid" })
    }
}

/// Checks that need only the credential and a clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalChecks {
    pub signature: SignatureVerdict,
    pub expired: bool,
}

/// What the credential store knows about a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStatus {
    /// A stored credential for the subject is structurally identical.
    pub exists_in_store: bool,
    /// That stored credential has been revoked.
    pub revoked: bool,
    /// Set when the store could not answer. Membership is then unknown and
    /// reported as absent.
    pub error: Option<String>,
}

impl LedgerStatus {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub is_valid: bool,
    pub signature: SignatureVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_error: Option<String>,
    pub expired: bool,
    pub exists_in_store: bool,
    pub revoked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_error: Option<String>,
    pub issuer: String,
    pub subject: String,
    pub credential_type: String,
    pub issuance_date: Timestamp,
    pub expiration_date: Option<Timestamp>,
    pub checked_at: Timestamp,
}

impl VerificationReport {
    pub fn assemble(
        credential: &VerifiableCredential,
        local: LocalChecks,
        ledger: LedgerStatus,
        checked_at: Timestamp,
    ) -> Self {
        let is_valid =
            local.signature.valid && !local.expired && ledger.exists_in_store && !ledger.revoked;
        Self {
            is_valid,
            signature_error: local.signature.reason.clone(),
            signature: local.signature,
            expired: local.expired,
            exists_in_store: ledger.exists_in_store,
            revoked: ledger.revoked,
            ledger_error: ledger.error,
            issuer: credential.issuer.clone(),
            subject: credential.subject_id().to_string(),
            credential_type: credential.specific_type().unwrap_or("Unknown").to_string(),
            issuance_date: credential.issuance_date,
            expiration_date: credential.expiration_date,
            checked_at,
        }
    }
}

#[derive(Clone)]
pub struct CredentialVerifier {
    checker: Arc<dyn SignatureChecker>,
    max_payload_bytes: usize,
}

impl CredentialVerifier {
    pub fn new(checker: Arc<dyn SignatureChecker>) -> Self {
        Self {
            checker,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    pub fn with_max_payload_bytes(mut self, max: usize) -> Self {
        self.max_payload_bytes = max;
        self
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }

    /// Parse untrusted input into a credential.
    pub fn parse(&self, raw: RawCredential) -> Result<ParsedCredential, VcError> {
        let document = match raw {
            RawCredential::Text(text) => {
                self.check_size(text.len())?;
                serde_json::from_str::<Value>(&text)
                    .map_err(|e| VcError::Malformed(format!("not valid JSON: {e}")))?
            }
            RawCredential::Document(doc) => {
                self.check_size(serde_json::to_vec(&doc)?.len())?;
                doc
            }
        };
        if !document.is_object() {
            return Err(VcError::Malformed("credential must be a JSON object".into()));
        }
        let credential: VerifiableCredential = serde_json::from_value(document.clone())
            .map_err(|e| VcError::Malformed(e.to_string()))?;
        if !credential.context.includes_vc_context() {
            return Err(VcError::Malformed(format!("@context must include {VC_CONTEXT}")));
        }
        if !credential.has_base_type() {
            return Err(VcError::Malformed(
                "type must include VerifiableCredential".into(),
            ));
        }
        Ok(ParsedCredential {
            document,
            credential,
        })
    }

    /// Signature and expiry checks. Both always run.
    pub fn local_checks(&self, credential: &VerifiableCredential, now: Timestamp) -> LocalChecks {
        LocalChecks {
            signature: self.check_signature(credential),
            expired: credential.is_expired_at(now),
        }
    }

    fn check_signature(&self, credential: &VerifiableCredential) -> SignatureVerdict {
        let Some(proof) = credential.proof.as_ref() else {
            return SignatureVerdict::failed("credential has no proof");
        };
        let payload = match credential.signing_input() {
            Ok(p) => p,
            Err(e) => return SignatureVerdict::failed(e.to_string()),
        };
        match self.checker.check(&payload, proof, &credential.issuer) {
            Ok(()) => SignatureVerdict::ok(),
            Err(e) => SignatureVerdict::failed(e.to_string()),
        }
    }

    fn check_size(&self, len: usize) -> Result<(), VcError> {
        if len > self.max_payload_bytes {
            return Err(VcError::Malformed(format!(
                "payload of {len} bytes exceeds limit of {}",
                self.max_payload_bytes
            )));
        }
        Ok(())
    }
}
