//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: repository and codec wiring
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: body extraction with those error shapes
//! - `config.rs`: environment-driven startup configuration

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use crate::middleware;

pub mod config;
pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: config::AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(&config).await?);
    Ok(build_app_with_services(services))
}

/// Router over pre-built services; what the black-box tests spawn.
pub fn build_app_with_services(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        codec: services.codec.clone(),
    };

    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    // Login and logout stay outside the auth layer: login has no session
    // yet and logout must succeed with an expired one.
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .layer(Extension(services))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
