//! Business Services
//!
//! This module contains the core business logic:
//!
//! - `CategoryService` - payload validation, tree build/read, item view,
//!   and the replace/fetch/clear orchestration
//!
//! Services coordinate between the database layer and the API surface,
//! implementing the validate-fully-before-mutating rule.

pub mod category_service;
pub mod error;

pub use category_service::CategoryService;
pub use error::CategoryServiceError;
