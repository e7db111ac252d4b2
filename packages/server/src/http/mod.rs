//! HTTP server for the taxonomy API
//!
//! This module provides the REST surface over `taxonomy-core`:
//! routing, request/response encoding, and error-to-status mapping.
//! All tree semantics live in `CategoryService`; handlers only translate
//! between HTTP and the service API.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use taxonomy_core::services::CategoryService;

mod category_endpoints;
mod http_error;

pub use http_error::HttpError;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub category_service: Arc<CategoryService>,
}

impl AppState {
    pub fn new(category_service: Arc<CategoryService>) -> Self {
        Self { category_service }
    }
}

/// Create the application router with all endpoint modules
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(category_endpoints::routes(state))
        .layer(TraceLayer::new_for_http())
}
