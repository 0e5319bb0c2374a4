//! # API Route Modules
//!
//! - `identity`: registration, DID login, whoami, public DID view.
//! - `credentials`: issuance, listing, lookup, revocation, verification.
//! - `notifications`: per-principal inbox.
//!
//! [`public`] and [`authenticated`] split the surface so that the auth
//! middleware wraps only the second.

pub mod credentials;
pub mod identity;
pub mod notifications;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Routes that need no bearer token.
pub fn public() -> Router<AppState> {
    Router::new()
        .route("/v1/register", post(identity::register))
        .route("/v1/auth/did-login", post(identity::did_login))
        .route("/v1/did/{did}", get(identity::did_profile))
        .route("/v1/credentials/verify", post(credentials::verify_credential))
        .route("/v1/credentials/samples", get(credentials::sample_credentials))
}

/// Routes that require a resolved [`crate::auth::CallerIdentity`].
pub fn authenticated() -> Router<AppState> {
    Router::new()
        .route("/v1/me", get(identity::me))
        .route("/v1/credentials", get(credentials::list_credentials))
        .route("/v1/credentials/issue", post(credentials::issue_credential))
        .route(
            "/v1/credentials/{id}",
            get(credentials::get_credential).delete(credentials::revoke_credential),
        )
        .route("/v1/notifications", get(notifications::list_notifications))
        .route("/v1/notifications/{id}/read", post(notifications::mark_read))
}
