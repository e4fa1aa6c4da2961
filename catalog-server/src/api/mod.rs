//! API Routing
//!
//! Thin transport layer: handlers translate JSON bodies and query
//! strings into domain-service calls and let [`crate::utils::AppError`]
//! map failures onto status codes.
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`products`] - product management endpoints
//! - [`attributes`] - read-only attribute catalog endpoints

pub mod attributes;
pub mod health;
pub mod products;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(attributes::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
