//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: collection wiring (seeded stores, id generators, handlers)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response mapping helpers
//! - `errors.rs`: the single JSON error envelope

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::request_context))
            .layer(Extension(services)),
    )
}
