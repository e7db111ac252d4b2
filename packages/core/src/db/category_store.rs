//! CategoryStore - Row Operations for the Categories Table
//!
//! Thin data-access layer over [`DatabaseService`] providing the row
//! operations the service layer composes into tree operations:
//! create, read, delete-all, and query-by-parent.
//!
//! # Design
//!
//! 1. **Pure row moving**: no business logic, no recursion
//! 2. **Row conversion**: handles libsql::Row to Category conversion in one
//!    central place
//! 3. **Stable ordering**: all multi-row queries order by rowid, i.e.
//!    creation order, so repeated reads of the same state are deterministic

use crate::db::{DatabaseError, DatabaseService};
use crate::models::Category;
use chrono::{DateTime, NaiveDateTime, Utc};
use libsql::Row;
use std::sync::Arc;

const CATEGORY_COLUMNS: &str = "id, name, parent_id, created_at";

/// Data-access layer for category rows.
pub struct CategoryStore {
    db: Arc<DatabaseService>,
}

impl CategoryStore {
    /// Create a new CategoryStore over an initialized database service.
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Parse timestamp from database - handles both SQLite and RFC3339 formats
    ///
    /// SQLite CURRENT_TIMESTAMP returns: "YYYY-MM-DD HH:MM:SS"
    /// Old data might use RFC3339: "YYYY-MM-DDTHH:MM:SSZ"
    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(naive.and_utc());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        Err(DatabaseError::sql_execution(format!(
            "Unable to parse timestamp '{}' as SQLite or RFC3339 format",
            s
        )))
    }

    /// Convert libsql::Row to Category model
    ///
    /// Expected columns (in order): id, name, parent_id, created_at.
    fn row_to_category(row: &Row) -> Result<Category, DatabaseError> {
        let id: String = row
            .get(0)
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get id: {}", e)))?;
        let name: String = row
            .get(1)
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get name: {}", e)))?;
        let parent_id: Option<String> = row
            .get(2)
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get parent_id: {}", e)))?;
        let created_at_str: String = row.get(3).map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to get created_at: {}", e))
        })?;

        let created_at = Self::parse_timestamp(&created_at_str)?;

        Ok(Category {
            id,
            name,
            parent_id,
            created_at,
        })
    }

    /// Drain a rows iterator into categories.
    async fn collect_rows(mut rows: libsql::Rows) -> Result<Vec<Category>, DatabaseError> {
        let mut categories = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to fetch row: {}", e)))?
        {
            categories.push(Self::row_to_category(&row)?);
        }
        Ok(categories)
    }

    /// Insert a category row.
    ///
    /// A UNIQUE violation on `name` surfaces as `DatabaseError::NameConflict`
    /// so the service layer can report it as a duplicate-name failure.
    pub async fn insert(&self, category: &Category) -> Result<(), DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO categories (id, name, parent_id) VALUES (?, ?, ?)",
            (
                category.id.as_str(),
                category.name.as_str(),
                category.parent_id.as_deref(),
            ),
        )
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint failed") {
                DatabaseError::name_conflict(category.name.clone())
            } else {
                DatabaseError::sql_execution(format!("Failed to insert category: {}", msg))
            }
        })?;

        Ok(())
    }

    /// Fetch a single category by id.
    pub async fn get(&self, id: &str) -> Result<Option<Category>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM categories WHERE id = ?",
                CATEGORY_COLUMNS
            ))
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare get query: {}", e))
            })?;

        let mut rows = stmt.query([id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute get query: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::row_to_category(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetch all categories with the given parent, in creation order.
    ///
    /// `None` selects the roots (rows with `parent_id IS NULL`).
    pub async fn children_of(&self, parent_id: Option<&str>) -> Result<Vec<Category>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let rows = match parent_id {
            Some(parent_id) => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM categories WHERE parent_id = ? ORDER BY rowid ASC",
                        CATEGORY_COLUMNS
                    ))
                    .await
                    .map_err(|e| {
                        DatabaseError::sql_execution(format!(
                            "Failed to prepare children query: {}",
                            e
                        ))
                    })?;
                stmt.query([parent_id]).await
            }
            None => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM categories WHERE parent_id IS NULL ORDER BY rowid ASC",
                        CATEGORY_COLUMNS
                    ))
                    .await
                    .map_err(|e| {
                        DatabaseError::sql_execution(format!("Failed to prepare roots query: {}", e))
                    })?;
                stmt.query(()).await
            }
        }
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute children query: {}", e))
        })?;

        Self::collect_rows(rows).await
    }

    /// Fetch all categories sharing the given parent, excluding one id,
    /// in creation order.
    ///
    /// A `None` parent selects the other roots.
    pub async fn siblings_of(
        &self,
        parent_id: Option<&str>,
        exclude_id: &str,
    ) -> Result<Vec<Category>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let rows = match parent_id {
            Some(parent_id) => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM categories WHERE parent_id = ? AND id != ? ORDER BY rowid ASC",
                        CATEGORY_COLUMNS
                    ))
                    .await
                    .map_err(|e| {
                        DatabaseError::sql_execution(format!(
                            "Failed to prepare siblings query: {}",
                            e
                        ))
                    })?;
                stmt.query([parent_id, exclude_id]).await
            }
            None => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM categories WHERE parent_id IS NULL AND id != ? ORDER BY rowid ASC",
                        CATEGORY_COLUMNS
                    ))
                    .await
                    .map_err(|e| {
                        DatabaseError::sql_execution(format!(
                            "Failed to prepare siblings query: {}",
                            e
                        ))
                    })?;
                stmt.query([exclude_id]).await
            }
        }
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute siblings query: {}", e))
        })?;

        Self::collect_rows(rows).await
    }

    /// Fetch the current root (first row with no parent), if any.
    pub async fn root(&self) -> Result<Option<Category>, DatabaseError> {
        let roots = self.children_of(None).await?;
        Ok(roots.into_iter().next())
    }

    /// Delete all category rows, returning the number of rows removed.
    pub async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let rows_affected = conn
            .execute("DELETE FROM categories", ())
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to delete categories: {}", e))
            })?;

        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (CategoryStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(DatabaseService::new(db_path).await.unwrap());
        (CategoryStore::new(db), temp_dir)
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let (store, _temp_dir) = create_test_store().await;

        let category = Category::new("Electronics".to_string(), None);
        store.insert(&category).await.unwrap();

        let fetched = store.get(&category.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, category.id);
        assert_eq!(fetched.name, "Electronics");
        assert!(fetched.parent_id.is_none());
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let (store, _temp_dir) = create_test_store().await;

        let fetched = store.get("no-such-id").await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn duplicate_name_is_a_name_conflict() {
        let (store, _temp_dir) = create_test_store().await;

        let first = Category::new("Books".to_string(), None);
        store.insert(&first).await.unwrap();

        let second = Category::new("Books".to_string(), Some(first.id.clone()));
        let err = store.insert(&second).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NameConflict { name } if name == "Books"));
    }

    #[tokio::test]
    async fn children_are_returned_in_creation_order() {
        let (store, _temp_dir) = create_test_store().await;

        let parent = Category::new("Parent".to_string(), None);
        store.insert(&parent).await.unwrap();

        for name in ["First", "Second", "Third"] {
            let child = Category::new(name.to_string(), Some(parent.id.clone()));
            store.insert(&child).await.unwrap();
        }

        let children = store.children_of(Some(&parent.id)).await.unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn siblings_exclude_self_and_handle_null_parent() {
        let (store, _temp_dir) = create_test_store().await;

        let root_a = Category::new("RootA".to_string(), None);
        let root_b = Category::new("RootB".to_string(), None);
        store.insert(&root_a).await.unwrap();
        store.insert(&root_b).await.unwrap();

        let siblings = store.siblings_of(None, &root_a.id).await.unwrap();
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].name, "RootB");
    }

    #[tokio::test]
    async fn delete_all_clears_the_table() {
        let (store, _temp_dir) = create_test_store().await;

        let root = Category::new("Root".to_string(), None);
        store.insert(&root).await.unwrap();
        let child = Category::new("Child".to_string(), Some(root.id.clone()));
        store.insert(&child).await.unwrap();

        let removed = store.delete_all().await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.root().await.unwrap().is_none());

        // Idempotent: deleting again removes nothing and succeeds
        let removed = store.delete_all().await.unwrap();
        assert_eq!(removed, 0);
    }
}
