//! Taxonomy Core Business Logic Layer
//!
//! This crate provides the data model, database layer, and service
//! orchestration for the taxonomy category-tree system.
//!
//! # Architecture
//!
//! - **Single entity**: one `categories` table with a nullable parent reference
//! - **Computed relations**: children, ancestors, and siblings are derived by
//!   query at read time, never stored as back-pointers
//! - **libsql**: embedded SQLite-compatible database
//! - **Replace-only lifecycle**: the whole tree is created in one bulk replace
//!   operation; no single-node mutation exists
//!
//! # Modules
//!
//! - [`models`] - Data structures (Category, CategoryTree, CategoryItem)
//! - [`services`] - Business services (CategoryService)
//! - [`db`] - Database layer with libsql integration

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::*;
pub use models::*;
pub use services::*;
