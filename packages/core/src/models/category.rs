//! Category Data Structures
//!
//! This module defines the stored `Category` entity and the shapes the
//! service layer assembles from it.
//!
//! # Architecture
//!
//! - **Parent-linked rows**: every category carries an optional `parent_id`;
//!   a `None` parent marks the root
//! - **Computed relations**: `CategoryTree` and `CategoryItem` are assembled
//!   from queries at read time; `Category` itself stores no child lists
//! - **Global name uniqueness**: `name` is unique across the whole store,
//!   not just among siblings (enforced by the database schema)
//!
//! # Examples
//!
//! ```rust
//! use taxonomy_core::models::Category;
//!
//! let root = Category::new("Electronics".to_string(), None);
//! let child = Category::new("Laptops".to_string(), Some(root.id.clone()));
//! assert_eq!(child.parent_id.as_deref(), Some(root.id.as_str()));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored category entity.
///
/// # Fields
///
/// - `id`: Unique identifier (UUID v4), assigned on creation, immutable
/// - `name`: Display name, globally unique and non-empty
/// - `parent_id`: Optional reference to the parent category (`None` = root)
/// - `created_at`: Timestamp when the row was created; doubles as the
///   stable child ordering key for reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier (UUID v4 string)
    pub id: String,

    /// Globally unique display name
    pub name: String,

    /// Parent category ID (`None` marks the root)
    pub parent_id: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new Category with an auto-generated UUID.
    pub fn new(name: String, parent_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            parent_id,
            created_at: Utc::now(),
        }
    }

    /// Flat `{id, name}` projection used by the item view.
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Nested tree representation returned by whole-tree reads.
///
/// Field order is fixed (`id`, `name`, `children`) and `children` is always
/// serialized, as an empty list for leaves — never omitted, never `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTree {
    pub id: String,
    pub name: String,
    pub children: Vec<CategoryTree>,
}

/// Flat `{id, name}` shape used for parents/children/siblings lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
}

/// Single-item view: the category's own fields plus its computed relations.
///
/// `parents` is ordered nearest-first (immediate parent first, root last).
/// `children` and `siblings` are in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
    pub parents: Vec<CategorySummary>,
    pub children: Vec<CategorySummary>,
    pub siblings: Vec<CategorySummary>,
}
