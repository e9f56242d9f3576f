//! HTTP application wiring (Axum router + service wiring).
//!
//! Folder layout:
//! - `services.rs`: collaborator wiring (store, broker, workers, auth)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get, routing::post};
use tower::ServiceBuilder;

use taskdeck_auth::UserDirectory;
use taskdeck_jobs::Mailer;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(
    cfg: AppConfig,
    users: Arc<UserDirectory>,
    mailer: Arc<dyn Mailer>,
) -> Router {
    let services = Arc::new(services::build_services(&cfg, users, mailer));
    let auth_state = middleware::AuthState {
        codec: services.codec.clone(),
    };

    // Protected routes: require a valid bearer token + owner context.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/token/", post(routes::token::issue))
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
