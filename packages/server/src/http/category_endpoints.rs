//! Category Tree Endpoints
//!
//! The whole HTTP surface of the taxonomy service:
//!
//! - `POST /categories/` - Replace the whole tree with the request payload
//! - `GET /categories/` - Fetch the current tree (null when empty)
//! - `DELETE /categories/` - Clear all categories
//! - `GET /categories/:id/` - Fetch one category with parents/children/siblings
//! - `GET /health` - Health check
//!
//! Each route is registered with and without the trailing slash so both
//! spellings resolve to the same handler.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::http::{AppState, HttpError};
use taxonomy_core::models::{CategoryItem, CategoryTree};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
///
/// Returns server status and version information.
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Replace the whole category tree
///
/// Validates the entire nested payload before any store mutation; on
/// success the previous tree is deleted, the payload is inserted, and the
/// freshly-read nested tree is returned.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3000/categories/ \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Electronics", "children": [{"name": "Phones"}]}'
/// ```
async fn replace_tree(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<CategoryTree>, HttpError> {
    let tree = state.category_service.replace_tree(&payload).await?;

    tracing::debug!(root_id = %tree.id, "Replaced category tree");

    Ok(Json(tree))
}

/// Fetch the current category tree
///
/// Returns the nested tree rooted at the parentless category, or a `null`
/// body when the store is empty.
async fn fetch_tree(State(state): State<AppState>) -> Result<Json<Option<CategoryTree>>, HttpError> {
    let tree = state.category_service.fetch_tree().await?;
    Ok(Json(tree))
}

/// Clear all categories
///
/// Always succeeds and returns `{}`; clearing an empty store is a no-op.
async fn clear_all(State(state): State<AppState>) -> Result<Json<Value>, HttpError> {
    state.category_service.clear_all().await?;
    Ok(Json(serde_json::json!({})))
}

/// Fetch a single category with its computed relations
///
/// `parents` is ordered nearest-first (immediate parent first, root last);
/// `children` and `siblings` are flat `{id, name}` lists in creation order.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3000/categories/2c11e967-6d55-4df5-9b0b-4a5fdcd0e870/
/// ```
async fn fetch_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryItem>, HttpError> {
    let item = state.category_service.read_item(&id).await?;
    Ok(Json(item))
}

pub fn routes(state: AppState) -> Router {
    let collection = get(fetch_tree).post(replace_tree).delete(clear_all);

    Router::new()
        .route("/health", get(health_check))
        .route("/categories", collection.clone())
        .route("/categories/", collection)
        .route("/categories/:id", get(fetch_item))
        .route("/categories/:id/", get(fetch_item))
        .with_state(state)
}
