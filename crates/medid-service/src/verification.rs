//! Public credential verification.
//!
//! Parsing failures short-circuit with `MALFORMED_CREDENTIAL`. Otherwise the
//! signature, expiry and ledger checks all run and land in one report. A
//! ledger that cannot be read leaves `existsInStore = false` and sets
//! `ledgerError`; the local checks are still reported.
//!
//! Ledger membership is structural: the supplied document must have the same
//! canonical digest as a record stored for its subject. A copy with any field
//! changed is reported as absent even if it parses and its proof checks out.

use medid_core::{Did, Timestamp};
use medid_vc::verifier::ParsedCredential;
use medid_vc::{content_digest, LedgerStatus, RawCredential, VerificationReport};
use tracing::{info, warn};

use crate::deadline::within;
use crate::error::ServiceError;
use crate::MedidService;

impl MedidService {
    pub async fn verify(&self, raw: RawCredential) -> Result<VerificationReport, ServiceError> {
        self.verify_at(raw, Timestamp::now()).await
    }

    /// Verify as of `now`.
    pub async fn verify_at(
        &self,
        raw: RawCredential,
        now: Timestamp,
    ) -> Result<VerificationReport, ServiceError> {
        let parsed = match self.verifier.parse(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                metrics::counter!("medid_verifications_total", "outcome" => "malformed")
                    .increment(1);
                return Err(e.into());
            }
        };
        let local = self.verifier.local_checks(&parsed.credential, now);
        let ledger = match self.ledger_status(&parsed).await {
            Ok(ledger) => ledger,
            Err(err) => {
                warn!(error = %err, "ledger unavailable during verification");
                LedgerStatus::unavailable(err.to_string())
            }
        };
        let report = VerificationReport::assemble(&parsed.credential, local, ledger, now);

        let outcome = if report.is_valid { "valid" } else { "invalid" };
        metrics::counter!("medid_verifications_total", "outcome" => outcome).increment(1);
        info!(
            issuer = %report.issuer,
            subject = %report.subject,
            valid = report.is_valid,
            signature_ok = report.signature.valid,
            expired = report.expired,
            exists_in_store = report.exists_in_store,
            revoked = report.revoked,
            ledger_error = report.ledger_error.as_deref(),
            "credential verified"
        );
        Ok(report)
    }

    async fn ledger_status(
        &self,
        parsed: &ParsedCredential,
    ) -> Result<LedgerStatus, ServiceError> {
        // A subject that is not a DID cannot have been issued here.
        let Ok(subject) = Did::new(parsed.credential.subject_id()) else {
            return Ok(LedgerStatus::default());
        };
        let digest = content_digest(&parsed.document)?;
        let records = within(
            self.config.store_timeout,
            "ledger lookup",
            self.credentials.find_by_subject(&subject),
        )
        .await?;
        Ok(records
            .iter()
            .find(|r| r.content_hash == digest)
            .map(|r| LedgerStatus {
                exists_in_store: true,
                revoked: r.is_revoked(),
                ..LedgerStatus::default()
            })
            .unwrap_or_default())
    }
}
