//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations. Validation
//! failures are detected before any store mutation, so every variant except
//! `Database` maps cleanly to a client-facing outcome.

use crate::db::DatabaseError;
use thiserror::Error;

/// Category service errors
///
/// The validation variants (`MissingField`, `UnknownFields`,
/// `InvalidPayload`, `DuplicateNameInRequest`) are raised by the read-only
/// validation pass and leave the store untouched. `DuplicateNameInStore`
/// is the store's UNIQUE constraint acting as a final defense at write
/// time.
#[derive(Error, Debug)]
pub enum CategoryServiceError {
    /// Required field absent or empty
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Payload node carried fields beyond name/children
    #[error("Got unknown fields: {}", .keys.join(", "))]
    UnknownFields { keys: Vec<String> },

    /// Payload node structurally malformed (wrong JSON type)
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The same name appears twice within one request payload
    #[error("Duplicate category name in request: {name}")]
    DuplicateNameInRequest { name: String },

    /// The store rejected a name that already exists
    #[error("Category(name={name}) already exists. Send DELETE to clear table.")]
    DuplicateNameInStore { name: String },

    /// Category not found by id
    #[error("Category(id={id}) doesn't exist")]
    CategoryNotFound { id: String },

    /// Database operation failed
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),
}

impl CategoryServiceError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an unknown fields error
    pub fn unknown_fields(keys: Vec<String>) -> Self {
        Self::UnknownFields { keys }
    }

    /// Create an invalid payload error
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::CategoryNotFound { id: id.into() }
    }
}
