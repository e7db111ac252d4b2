//! Data Models
//!
//! This module contains the core data structures used throughout the taxonomy
//! system:
//!
//! - `Category` - the stored entity (one row per node)
//! - `CategoryTree` - nested output shape for whole-tree reads
//! - `CategorySummary` / `CategoryItem` - flat shapes for single-item reads
//!
//! Relations between categories (children, ancestors, siblings) are computed
//! on read and only exist in the output shapes, never on `Category` itself.

mod category;

pub use category::{Category, CategoryItem, CategorySummary, CategoryTree};
