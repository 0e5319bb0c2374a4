//! # OpenAPI Specification
//!
//! Assembled from the `#[utoipa::path]` annotations and served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "`{principalId}:{secret}`, or `{principalId}` when no secret is configured.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "medid API",
        description = "Decentralized identifiers and verifiable credentials for patients and doctors.\n\nDoctors issue W3C verifiable credentials to patients. Anyone can verify a presented credential against the issuance ledger.\n\nAuthentication: `Authorization: Bearer <token>`. Registration, DID login, DID views, verification and samples are public.",
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        crate::routes::identity::register,
        crate::routes::identity::did_login,
        crate::routes::identity::me,
        crate::routes::identity::did_profile,
        crate::routes::credentials::issue_credential,
        crate::routes::credentials::list_credentials,
        crate::routes::credentials::get_credential,
        crate::routes::credentials::revoke_credential,
        crate::routes::credentials::verify_credential,
        crate::routes::credentials::sample_credentials,
        crate::routes::notifications::list_notifications,
        crate::routes::notifications::mark_read,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            crate::routes::identity::RegisterRequest,
            crate::routes::identity::DidLoginRequest,
            crate::routes::identity::PrincipalResponse,
            crate::routes::identity::DidProfileResponse,
            crate::routes::credentials::IssueCredentialRequest,
            crate::routes::credentials::IssueCredentialResponse,
            crate::routes::credentials::CredentialResponse,
            crate::routes::credentials::CredentialListResponse,
            crate::routes::credentials::RevokeResponse,
            crate::routes::credentials::VerifyRequest,
            crate::routes::credentials::VerifyResponse,
            crate::routes::credentials::SamplesResponse,
            crate::routes::notifications::NotificationListResponse,
            crate::routes::notifications::NotificationResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "identity", description = "Principals and DID documents"),
        (name = "credentials", description = "Issuance, revocation and verification"),
        (name = "notifications", description = "Per-principal inbox"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let spec = ApiDoc::openapi();
        for path in [
            "/v1/register",
            "/v1/auth/did-login",
            "/v1/me",
            "/v1/did/{did}",
            "/v1/credentials",
            "/v1/credentials/issue",
            "/v1/credentials/{id}",
            "/v1/credentials/verify",
            "/v1/credentials/samples",
            "/v1/notifications",
            "/v1/notifications/{id}/read",
        ] {
            assert!(spec.paths.paths.contains_key(path), "{path} missing");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let spec = ApiDoc::openapi();
        let components = spec.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
