//! Database Layer
//!
//! This module handles all database interactions using libsql:
//!
//! - Database initialization and connection management
//! - The `categories` table (parent-linked rows, globally unique names)
//! - Row-level create/read/delete-all/query-by-parent operations
//!
//! Business rules (validation, tree orchestration) live in the service
//! layer; this module only moves rows.

mod category_store;
mod database;
mod error;

pub use category_store::CategoryStore;
pub use database::DatabaseService;
pub use error::DatabaseError;
