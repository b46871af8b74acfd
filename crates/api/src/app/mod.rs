//! Axum router and startup composition.
//!
//! - `services.rs`: builds repositories, services and the change-dispatch path
//! - `routes/`: one file per resource, plus the route table in `routes/mod.rs`
//! - `dto.rs`: request/response shapes that are not domain types
//! - `errors.rs`: error bodies and status mapping

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use dancu_infra::config::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router.
///
/// Must run inside a Tokio runtime: asynchronous dispatch spawns the fee
/// listener worker here.
pub async fn build_app(config: &AppConfig) -> Router {
    let jwt = Arc::new(dancu_auth::Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(services::build_services(config));

    let protected = routes::router()
        .layer(axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(services)),
        )
}
