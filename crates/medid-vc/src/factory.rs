//! # Credential Factory
//!
//! Builds a signed credential for `(issuer, subject, kind, claims)`.
//!
//! - Empty claims fall back to [`sample_claims`] for the kind.
//! - `credentialSubject.id` is always the subject DID; a claim named `id`
//!   is rejected rather than allowed to override it.
//! - `expirationDate` is set only when the kind has a validity policy.
//! - The proof comes from the injected [`Signer`] over the signing input.
//!
//! No persistence happens here.

use std::sync::Arc;

use medid_core::{Did, Timestamp};
use tracing::debug;

use crate::claims::{sample_claims, Claims};
use crate::credential::{ContextValue, CredentialSubject, VerifiableCredential};
use crate::error::VcError;
use crate::kind::CredentialKind;
use crate::proof::Proof;
use crate::signer::Signer;

/// Fragment of the issuer key every proof references.
pub const ISSUER_KEY_FRAGMENT: &str = "key-1";

/// Inputs to [`CredentialFactory::issue`].
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub issuer: Did,
    pub subject: Did,
    pub kind: CredentialKind,
    pub claims: Claims,
    /// Used by sample claims when `claims` is empty.
    pub subject_name: Option<String>,
}

#[derive(Clone)]
pub struct CredentialFactory {
    signer: Arc<dyn Signer>,
}

impl CredentialFactory {
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        Self { signer }
    }

    /// Issue with `issuanceDate = now`.
    pub fn issue(&self, request: IssueRequest) -> Result<VerifiableCredential, VcError> {
        self.issue_at(request, Timestamp::now())
    }

    /// Issue with an explicit issuance instant.
    pub fn issue_at(
        &self,
        request: IssueRequest,
        issued_at: Timestamp,
    ) -> Result<VerifiableCredential, VcError> {
        let IssueRequest {
            issuer,
            subject,
            kind,
            claims,
            subject_name,
        } = request;

        if claims.contains_key("id") {
            return Err(VcError::ReservedClaim("id".into()));
        }
        let claims = if claims.is_empty() {
            sample_claims(&kind, subject_name.as_deref(), issued_at).unwrap_or_default()
        } else {
            claims
        };

        let mut vc = VerifiableCredential {
            context: ContextValue::default(),
            types: kind.type_array(),
            issuer: issuer.to_string(),
            issuance_date: issued_at,
            expiration_date: kind.validity().map(|p| p.expiration_from(issued_at)),
            credential_subject: CredentialSubject {
                id: subject.to_string(),
                claims,
            },
            proof: None,
        };

        let payload = vc.signing_input()?;
        let signature = self.signer.sign(&payload, &issuer)?;
        vc.proof = Some(Proof::assertion(
            self.signer.proof_type(),
            issued_at,
            issuer.fragment(ISSUER_KEY_FRAGMENT),
            signature,
        ));

        debug!(issuer = %issuer, subject = %subject, kind = %kind, "credential built");
        Ok(vc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::VC_BASE_TYPE;
    use crate::signer::{PlaceholderChecker, PlaceholderSigner, SignatureChecker};
    use serde_json::json;

    fn factory() -> CredentialFactory {
        CredentialFactory::new(Arc::new(PlaceholderSigner))
    }

    fn request(kind: CredentialKind, claims: Claims) -> IssueRequest {
        IssueRequest {
            issuer: Did::new("did:example:doctorhouse00000001").unwrap(),
            subject: Did::new("did:example:patientjane0000001").unwrap(),
            kind,
            claims,
            subject_name: Some("Jane Doe".into()),
        }
    }

    fn at() -> Timestamp {
        Timestamp::parse("2026-02-10T08:00:00Z").unwrap()
    }

    #[test]
    fn vaccination_gets_samples_and_five_year_expiry() {
        let vc = factory()
            .issue_at(request(CredentialKind::Vaccination, Claims::new()), at())
            .unwrap();
        assert_eq!(vc.types, vec![VC_BASE_TYPE, "VaccinationCredential"]);
        assert_eq!(vc.issuance_date, at());
        assert_eq!(vc.expiration_date, Some(at().plus_years(5)));
        let claims = &vc.credential_subject.claims;
        assert_eq!(claims["vaccineName"], "COVID-19 mRNA Vaccine");
        assert_eq!(claims["manufacturer"], "Pfizer-BioNTech");
        assert_eq!(claims["batchNumber"], "ABC123");
        assert_eq!(claims["patientName"], "Jane Doe");
        assert_eq!(vc.subject_id(), "did:example:patientjane0000001");
    }

    #[test]
    fn custom_claims_are_used_verbatim() {
        let mut claims = Claims::new();
        claims.insert("result".into(), json!("negative"));
        let vc = factory()
            .issue_at(request(CredentialKind::BloodTest, claims.clone()), at())
            .unwrap();
        assert_eq!(vc.credential_subject.claims, claims);
        assert!(vc.expiration_date.is_none());
    }

    #[test]
    fn kinds_without_samples_get_empty_claims() {
        let vc = factory()
            .issue_at(request(CredentialKind::Prescription, Claims::new()), at())
            .unwrap();
        assert!(vc.credential_subject.claims.is_empty());
        let vc = factory()
            .issue_at(
                request(CredentialKind::Other("AllergyCredential".into()), Claims::new()),
                at(),
            )
            .unwrap();
        assert!(vc.credential_subject.claims.is_empty());
        assert_eq!(vc.specific_type(), Some("AllergyCredential"));
    }

    #[test]
    fn subject_id_cannot_be_overridden() {
        let mut claims = Claims::new();
        claims.insert("id".into(), json!("did:example:attacker"));
        assert!(matches!(
            factory().issue_at(request(CredentialKind::BloodTest, claims), at()),
            Err(VcError::ReservedClaim(_))
        ));
    }

    #[test]
    fn proof_covers_the_built_document() {
        let vc = factory()
            .issue_at(request(CredentialKind::HealthCheckup, Claims::new()), at())
            .unwrap();
        let proof = vc.proof.clone().unwrap();
        assert_eq!(proof.verification_method, "did:example:doctorhouse00000001#key-1");
        assert_eq!(proof.proof_purpose, "assertionMethod");
        assert_eq!(proof.created, at());
        PlaceholderChecker
            .check(&vc.signing_input().unwrap(), &proof, &vc.issuer)
            .unwrap();
    }

    #[test]
    fn same_inputs_same_document() {
        let a = factory()
            .issue_at(request(CredentialKind::Appointment, Claims::new()), at())
            .unwrap();
        let b = factory()
            .issue_at(request(CredentialKind::Appointment, Claims::new()), at())
            .unwrap();
        assert_eq!(a, b);
    }
}
