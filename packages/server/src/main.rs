//! Taxonomy HTTP Server Binary
//!
//! Starts the category-tree REST API backed by an embedded libsql database.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (port 3000, ./data/taxonomy.db)
//! cargo run --bin taxonomy-server
//!
//! # Custom port and database path
//! TAXONOMY_PORT=8080 TAXONOMY_DB=/tmp/taxonomy.db cargo run --bin taxonomy-server
//! ```
//!
//! # Environment Variables
//!
//! - `TAXONOMY_PORT`: Server port (default: 3000)
//! - `TAXONOMY_DB`: Database file path (default: ./data/taxonomy.db)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use taxonomy_core::db::DatabaseService;
use taxonomy_core::services::CategoryService;
use taxonomy_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Taxonomy HTTP Server");

    let port = env::var("TAXONOMY_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    let db_path: PathBuf = env::var("TAXONOMY_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data/taxonomy.db"));

    tracing::info!("Port: {}", port);
    tracing::info!("Database: {}", db_path.display());

    // Initialize services
    let db = Arc::new(DatabaseService::new(db_path).await?);
    let category_service = Arc::new(CategoryService::new(db));

    let state = AppState::new(category_service);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
