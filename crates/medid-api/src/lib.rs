//! # medid-api: Axum API
//!
//! Thin HTTP collaborator over [`medid_service::MedidService`]. Handlers
//! parse, call one service operation, and map the result.
//!
//! ## API Surface
//!
//! | Route | Auth | Module |
//! |---|---|---|
//! | `POST /v1/register`, `POST /v1/auth/did-login`, `GET /v1/did/{did}` | no | [`routes::identity`] |
//! | `GET /v1/me` | yes | [`routes::identity`] |
//! | `POST /v1/credentials/verify`, `GET /v1/credentials/samples` | no | [`routes::credentials`] |
//! | `GET /v1/credentials`, `POST /v1/credentials/issue`, `GET`/`DELETE /v1/credentials/{id}` | yes | [`routes::credentials`] |
//! | `GET /v1/notifications`, `POST /v1/notifications/{id}/read` | yes | [`routes::notifications`] |
//! | `/health/*`, `/metrics`, `/openapi.json` | no | here, [`openapi`] |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → BodyLimit → AuthMiddleware (authenticated routes) → Handler
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;

/// HTTP bodies may carry the credential as escaped JSON text, so the
/// transport limit is a multiple of the verification cap.
const BODY_LIMIT_FACTOR: usize = 4;

/// Assemble the application router.
///
/// Health checks, `/metrics` and `/openapi.json` sit outside the auth
/// middleware so they stay reachable without credentials.
pub fn app(state: AppState) -> Router {
    let body_limit = state
        .service
        .config()
        .max_verify_bytes
        .saturating_mul(BODY_LIMIT_FACTOR);

    let authenticated = routes::authenticated()
        .route_layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    let api = Router::new()
        .merge(routes::public())
        .merge(authenticated)
        .merge(openapi::router())
        .route("/metrics", get(render_metrics))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

async fn liveness() -> &'static str {
    "ok"
}

/// 200 once both stores answer within the store deadline, else 503.
async fn readiness(State(state): State<AppState>) -> Response {
    match state.service.ready().await {
        Ok(()) => "ready".into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
        }
    }
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
