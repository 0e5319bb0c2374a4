//! # Authentication Middleware
//!
//! Bearer tokens name the calling principal:
//!
//! ```text
//! Bearer {principal_id}:{secret}   when a secret is configured
//! Bearer {principal_id}            development mode
//! ```
//!
//! The middleware resolves the principal through the service and injects a
//! [`CallerIdentity`] into the request extensions. Handlers take it as an
//! extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use medid_core::PrincipalId;
use medid_service::ServiceError;
use medid_store::Principal;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated principal of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub principal: Principal,
}

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Shared bearer secret. Custom `Debug` redacts it.
#[derive(Clone, Default)]
pub struct AuthConfig {
    secret: Option<String>,
}

impl AuthConfig {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Whether tokens must carry the secret.
    pub fn is_enforced(&self) -> bool {
        self.secret.is_some()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time comparison. A length mismatch still performs a comparison.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse `{principal_id}[:{secret}]` and check the secret against `config`.
pub fn parse_bearer_token(token: &str, config: &AuthConfig) -> Result<PrincipalId, String> {
    let (id, secret) = match token.split_once(':') {
        Some((id, secret)) => (id, Some(secret)),
        None => (token, None),
    };
    if let Some(expected) = &config.secret {
        match secret {
            Some(provided) if constant_time_token_eq(provided, expected) => {}
            _ => return Err("invalid bearer token".into()),
        }
    }
    id.trim()
        .parse::<PrincipalId>()
        .map_err(|_| "bearer token does not name a principal".to_string())
}

/// Resolve the bearer token to a principal or answer 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match header_value {
        Some(value) if value.starts_with("Bearer ") => &value[7..],
        Some(_) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            return unauthorized("authorization header must use Bearer scheme");
        }
        None => {
            tracing::debug!("authentication failed: missing authorization header");
            return unauthorized("missing authorization header");
        }
    };

    let id = match parse_bearer_token(token, &state.auth) {
        Ok(id) => id,
        Err(reason) => {
            tracing::warn!(%reason, "authentication failed");
            return unauthorized(&reason);
        }
    };

    match state.service.principal(id).await {
        Ok(principal) => {
            request.extensions_mut().insert(CallerIdentity { principal });
            next.run(request).await
        }
        Err(ServiceError::NotFound(_)) => {
            tracing::warn!(principal_id = %id, "authentication failed: unknown principal");
            unauthorized("unknown principal")
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

fn unauthorized(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}
