//! # Proof strategies
//!
//! The factory calls a [`Signer`] and embeds whatever it returns; the verifier
//! calls a [`SignatureChecker`]. Neither knows how proofs are made.
//!
//! Two strategies ship:
//!
//! - **Placeholder** (`PlaceholderSignature2024`): the signature value is
//!   `placeholder:<sha256 of the signing input>`. It proves nothing about the
//!   issuer, but it is bound to the content, so an edited credential fails.
//! - **Ed25519** (`Ed25519Signature2020`): a real signature by the issuer's
//!   key. Private keys come from a [`SigningKeyProvider`], public keys from a
//!   [`PublicKeyResolver`] keyed by verification-method DID URL.

use std::sync::Arc;

use medid_core::{sha256_hex, CanonicalBytes, Did};
use medid_crypto::{verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

use crate::error::VcError;
use crate::proof::{Proof, ProofType};

const PLACEHOLDER_PREFIX: &str = "placeholder:";

/// Produces the `signatureValue` for a credential's signing input.
pub trait Signer: Send + Sync {
    fn proof_type(&self) -> ProofType;

    fn sign(&self, payload: &CanonicalBytes, issuer: &Did) -> Result<String, VcError>;
}

/// Decides whether a proof is valid for a signing input and issuer.
pub trait SignatureChecker: Send + Sync {
    fn check(&self, payload: &CanonicalBytes, proof: &Proof, issuer: &str) -> Result<(), VcError>;
}

/// Looks up the Ed25519 key an issuer signs with.
pub trait SigningKeyProvider: Send + Sync {
    fn signing_key(&self, issuer: &Did) -> Option<Ed25519KeyPair>;
}

/// Resolves a verification-method DID URL to its Ed25519 public key.
pub trait PublicKeyResolver: Send + Sync {
    fn resolve(&self, verification_method: &str) -> Option<Ed25519PublicKey>;
}

/// Proof must name the issuer as controller and carry the expected type.
fn check_envelope(proof: &Proof, expected: &ProofType, issuer: &str) -> Result<(), VcError> {
    if &proof.proof_type != expected {
        return Err(VcError::InvalidProof(format!(
            "unsupported proof type {}",
            proof.proof_type
        )));
    }
    if proof.controller() != issuer {
        return Err(VcError::InvalidProof(format!(
            "verification method {} is not controlled by issuer {issuer}",
            proof.verification_method
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSigner;

impl Signer for PlaceholderSigner {
    fn proof_type(&self) -> ProofType {
        ProofType::PlaceholderSignature2024
    }

    fn sign(&self, payload: &CanonicalBytes, _issuer: &Did) -> Result<String, VcError> {
        Ok(format!("{PLACEHOLDER_PREFIX}{}", sha256_hex(payload)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderChecker;

impl SignatureChecker for PlaceholderChecker {
    fn check(&self, payload: &CanonicalBytes, proof: &Proof, issuer: &str) -> Result<(), VcError> {
        check_envelope(proof, &ProofType::PlaceholderSignature2024, issuer)?;
        let digest = proof
            .signature_value
            .strip_prefix(PLACEHOLDER_PREFIX)
            .filter(|d| is_lower_hex_digest(d))
            .ok_or_else(|| {
                VcError::InvalidProof("signature value is not a placeholder digest".into())
            })?;
        if digest != sha256_hex(payload) {
            return Err(VcError::InvalidProof("placeholder digest does not match content".into()));
        }
        Ok(())
    }
}

fn is_lower_hex_digest(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[derive(Clone)]
pub struct Ed25519Signer {
    keys: Arc<dyn SigningKeyProvider>,
}

impl Ed25519Signer {
    pub fn new(keys: Arc<dyn SigningKeyProvider>) -> Self {
        Self { keys }
    }
}

impl Signer for Ed25519Signer {
    fn proof_type(&self) -> ProofType {
        ProofType::Ed25519Signature2020
    }

    fn sign(&self, payload: &CanonicalBytes, issuer: &Did) -> Result<String, VcError> {
        let kp = self
            .keys
            .signing_key(issuer)
            .ok_or_else(|| VcError::MissingSigningKey(issuer.to_string()))?;
        Ok(kp.sign(payload).to_hex())
    }
}

#[derive(Clone)]
pub struct Ed25519Checker {
    keys: Arc<dyn PublicKeyResolver>,
}

impl Ed25519Checker {
    pub fn new(keys: Arc<dyn PublicKeyResolver>) -> Self {
        Self { keys }
    }
}

impl SignatureChecker for Ed25519Checker {
    fn check(&self, payload: &CanonicalBytes, proof: &Proof, issuer: &str) -> Result<(), VcError> {
        check_envelope(proof, &ProofType::Ed25519Signature2020, issuer)?;
        let pk = self.keys.resolve(&proof.verification_method).ok_or_else(|| {
            VcError::InvalidProof(format!("cannot resolve {}", proof.verification_method))
        })?;
        let sig = Ed25519Signature::from_hex(&proof.signature_value)?;
        verify_with_public_key(payload, &sig, &pk)?;
        Ok(())
    }
}
