//! # Credential API
//!
//! Issuance, listing, lookup and revocation require a bearer token.
//! Verification and the sample preview are public.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use medid_core::{CredentialId, Timestamp};
use medid_service::{sample_preview, CredentialView, IssueCredential, SAMPLE_PATIENT_NAME};
use medid_vc::{Claims, RawCredential, VerificationReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_credential_json, extract_path, extract_validated_json, Validate};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueCredentialRequest {
    /// DID of the patient receiving the credential.
    pub subject_did: String,
    /// e.g. `VaccinationCredential`.
    pub credential_type: String,
    /// Omit to use the sample claims for the type.
    #[serde(default)]
    pub claims: Option<Value>,
}

impl Validate for IssueCredentialRequest {
    fn validate(&self) -> Result<(), String> {
        if self.subject_did.trim().is_empty() {
            return Err("subjectDid must not be empty".to_string());
        }
        if self.credential_type.trim().is_empty() {
            return Err("credentialType must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueCredentialResponse {
    #[schema(value_type = Object)]
    pub credential: CredentialView,
    /// The signed W3C credential document.
    pub vc_document: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CredentialResponse {
    #[schema(value_type = Object)]
    pub credential: CredentialView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CredentialListResponse {
    #[schema(value_type = Vec<Object>)]
    pub credentials: Vec<CredentialView>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevokeResponse {
    #[schema(value_type = Object)]
    pub credential: CredentialView,
    /// False when the credential was already revoked.
    pub changed: bool,
}

/// Verification input. `vcData` may be the credential object or its JSON text.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(alias = "vcJson")]
    pub vc_data: Value,
}

impl VerifyRequest {
    fn into_raw(self) -> RawCredential {
        match self.vc_data {
            Value::String(text) => RawCredential::Text(text),
            other => RawCredential::Document(other),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    #[schema(value_type = Object)]
    pub verification: VerificationReport,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SamplesResponse {
    pub patient_name: String,
    #[schema(value_type = Object)]
    pub samples: BTreeMap<String, Claims>,
}

/// POST /v1/credentials/issue: Doctor issues a credential to a patient.
#[utoipa::path(
    post,
    path = "/v1/credentials/issue",
    request_body = IssueCredentialRequest,
    responses(
        (status = 201, description = "Credential issued", body = IssueCredentialResponse),
        (status = 403, description = "Caller is not a doctor", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown patient", body = crate::error::ErrorBody),
        (
            status = 409,
            description = "Identical credential already issued",
            body = crate::error::ErrorBody
        ),
        (status = 422, description = "Invalid type or claims", body = crate::error::ErrorBody),
        (status = 503, description = "Store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn issue_credential(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<IssueCredentialRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IssueCredentialResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let issued = state
        .service
        .issue_to_patient(
            &caller.principal,
            IssueCredential {
                subject_did: req.subject_did,
                credential_type: req.credential_type,
                claims: req.claims,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(IssueCredentialResponse {
            credential: CredentialView::at(issued.record, Timestamp::now()),
            vc_document: issued.vc_document,
        }),
    ))
}

/// GET /v1/credentials: Credentials held (patient) or issued (doctor).
#[utoipa::path(
    get,
    path = "/v1/credentials",
    responses(
        (status = 200, description = "Newest first", body = CredentialListResponse),
    ),
    tag = "credentials"
)]
pub(crate) async fn list_credentials(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<CredentialListResponse>, AppError> {
    let credentials = state.service.credentials_for(&caller.principal).await?;
    Ok(Json(CredentialListResponse {
        count: credentials.len(),
        credentials,
    }))
}

/// GET /v1/credentials/{id}: One credential, if the caller may see it.
#[utoipa::path(
    get,
    path = "/v1/credentials/{id}",
    params(("id" = String, Path, description = "Credential id")),
    responses(
        (status = 200, description = "Credential", body = CredentialResponse),
        (
            status = 403,
            description = "Not the subject, issuer or an admin",
            body = crate::error::ErrorBody
        ),
        (status = 404, description = "Unknown credential", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn get_credential(
    State(state): State<AppState>,
    caller: CallerIdentity,
    id: Result<Path<CredentialId>, PathRejection>,
) -> Result<Json<CredentialResponse>, AppError> {
    let id = extract_path(id)?;
    let credential = state.service.credential_by_id(&caller.principal, id).await?;
    Ok(Json(CredentialResponse { credential }))
}

/// DELETE /v1/credentials/{id}: Issuer revokes a credential.
#[utoipa::path(
    delete,
    path = "/v1/credentials/{id}",
    params(("id" = String, Path, description = "Credential id")),
    responses(
        (status = 200, description = "Revoked (or already revoked)", body = RevokeResponse),
        (status = 403, description = "Caller is not the issuer", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown credential", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn revoke_credential(
    State(state): State<AppState>,
    caller: CallerIdentity,
    id: Result<Path<CredentialId>, PathRejection>,
) -> Result<Json<RevokeResponse>, AppError> {
    let id = extract_path(id)?;
    let revocation = state.service.revoke(&caller.principal, id).await?;
    Ok(Json(RevokeResponse {
        credential: revocation.credential,
        changed: revocation.changed,
    }))
}

/// POST /v1/credentials/verify: Verify a presented credential.
#[utoipa::path(
    post,
    path = "/v1/credentials/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification report", body = VerifyResponse),
        (status = 413, description = "Body too large", body = crate::error::ErrorBody),
        (status = 422, description = "Not a credential", body = crate::error::ErrorBody),
    ),
    security(()),
    tag = "credentials"
)]
pub(crate) async fn verify_credential(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let req = extract_credential_json(body)?;
    let verification = state.service.verify(req.into_raw()).await?;
    Ok(Json(VerifyResponse { verification }))
}

/// GET /v1/credentials/samples: Sample claims per credential type.
#[utoipa::path(
    get,
    path = "/v1/credentials/samples",
    responses(
        (status = 200, description = "Sample claims keyed by type", body = SamplesResponse),
    ),
    security(()),
    tag = "credentials"
)]
pub(crate) async fn sample_credentials() -> Json<SamplesResponse> {
    Json(SamplesResponse {
        patient_name: SAMPLE_PATIENT_NAME.to_string(),
        samples: sample_preview(Timestamp::now()),
    })
}
