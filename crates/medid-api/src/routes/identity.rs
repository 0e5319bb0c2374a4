//! # Principals and DIDs
//!
//! - `POST /v1/register` creates a patient or doctor and its DID.
//! - `POST /v1/auth/did-login` resolves a DID to its principal.
//! - `GET /v1/me` returns the authenticated principal.
//! - `GET /v1/did/{did}` is the public DID view.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use medid_core::{Did, Role};
use medid_did::{DidDocument, PublicDidProfile};
use medid_service::{Registered, Registration};
use medid_store::Principal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_path, extract_validated_json, Validate};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// `patient` or `doctor`.
    #[schema(value_type = String)]
    pub role: Role,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DidLoginRequest {
    pub did_identifier: String,
}

impl Validate for DidLoginRequest {
    fn validate(&self) -> Result<(), String> {
        if self.did_identifier.trim().is_empty() {
            return Err("didIdentifier must not be empty".to_string());
        }
        Ok(())
    }
}

/// A principal together with its public DID view.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    #[schema(value_type = Object)]
    pub principal: Principal,
    pub did: DidProfileResponse,
}

impl From<Registered> for PrincipalResponse {
    fn from(r: Registered) -> Self {
        Self {
            principal: r.principal,
            did: r.did.into(),
        }
    }
}

/// Public DID view. Carries no private key material.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DidProfileResponse {
    #[schema(value_type = String)]
    pub did_identifier: Did,
    pub method: String,
    pub public_key: String,
    #[schema(value_type = Object)]
    pub did_document: DidDocument,
}

impl From<PublicDidProfile> for DidProfileResponse {
    fn from(p: PublicDidProfile) -> Self {
        Self {
            did_identifier: p.did_identifier,
            method: p.method,
            public_key: p.public_key,
            did_document: p.did_document,
        }
    }
}

/// POST /v1/register: Register a patient or doctor.
#[utoipa::path(
    post,
    path = "/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Principal registered", body = PrincipalResponse),
        (
            status = 409,
            description = "Email or DID already registered",
            body = crate::error::ErrorBody
        ),
        (status = 422, description = "Invalid field", body = crate::error::ErrorBody),
    ),
    security(()),
    tag = "identity"
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PrincipalResponse>), AppError> {
    let req = extract_json(body)?;
    let registered = state
        .service
        .register(Registration {
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(registered.into())))
}

/// POST /v1/auth/did-login: Look up the principal owning a DID.
#[utoipa::path(
    post,
    path = "/v1/auth/did-login",
    request_body = DidLoginRequest,
    responses(
        (status = 200, description = "Principal found", body = PrincipalResponse),
        (status = 404, description = "No principal owns this DID", body = crate::error::ErrorBody),
    ),
    security(()),
    tag = "identity"
)]
pub(crate) async fn did_login(
    State(state): State<AppState>,
    body: Result<Json<DidLoginRequest>, JsonRejection>,
) -> Result<Json<PrincipalResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let registered = state.service.login_with_did(&req.did_identifier).await?;
    tracing::info!(principal_id = %registered.principal.id, "did login");
    Ok(Json(registered.into()))
}

/// GET /v1/me: The authenticated principal.
#[utoipa::path(
    get,
    path = "/v1/me",
    responses(
        (status = 200, description = "Caller", body = PrincipalResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "identity"
)]
pub(crate) async fn me(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<PrincipalResponse>, AppError> {
    let registered = state.service.whoami(caller.principal.id).await?;
    Ok(Json(registered.into()))
}

/// GET /v1/did/{did}: Public DID document view.
#[utoipa::path(
    get,
    path = "/v1/did/{did}",
    params(("did" = String, Path, description = "DID identifier")),
    responses(
        (status = 200, description = "DID view", body = DidProfileResponse),
        (status = 404, description = "Unknown DID", body = crate::error::ErrorBody),
    ),
    security(()),
    tag = "identity"
)]
pub(crate) async fn did_profile(
    State(state): State<AppState>,
    did: Result<Path<String>, PathRejection>,
) -> Result<Json<DidProfileResponse>, AppError> {
    let did = extract_path(did)?;
    let profile = state.service.did_profile(&did).await?;
    Ok(Json(profile.into()))
}
