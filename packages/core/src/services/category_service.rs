//! CategoryService - Tree Validation, Build, and Read
//!
//! The one moderately intricate piece of the system: three recursive walks
//! over the same tree shape, plus a flat item view.
//!
//! - **Validation** (`validate_tree`): read-only pre-order walk of the
//!   request payload with a single shared set of seen names. Must succeed
//!   for the whole payload before any store mutation is attempted.
//! - **Build** (`build_tree`): pre-order recursive insert, parent before
//!   children, children in payload order. Does not re-validate names; the
//!   store's UNIQUE constraint remains as a final defense.
//! - **Read** (`read_tree`): depth-first recursive re-assembly of the
//!   nested representation, children in creation order.
//! - **Item view** (`read_item`): upward parent walk (nearest parent
//!   first, root last) plus children and siblings queries.
//!
//! The replace operation is clear-then-rebuild in two store steps, not one
//! transaction. A concurrent read between the steps observes a transiently
//! empty store; single-request-at-a-time semantics are assumed.

use crate::db::{CategoryStore, DatabaseError, DatabaseService};
use crate::models::{Category, CategoryItem, CategoryTree};
use crate::services::error::CategoryServiceError;
use serde_json::Value;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The payload keys a category node may carry.
const ALLOWED_KEYS: [&str; 2] = ["name", "children"];

type BoxedResult<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, CategoryServiceError>> + Send + 'a>>;

/// Business service for the category tree.
pub struct CategoryService {
    store: CategoryStore,
}

impl CategoryService {
    /// Create a new CategoryService over an initialized database service.
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self {
            store: CategoryStore::new(db),
        }
    }

    /// Validate a nested tree payload without touching the store.
    ///
    /// Pre-order walk, parent before children, children in payload order.
    /// Checks, per node:
    ///
    /// - the node is a JSON object
    /// - no keys beyond `name`/`children`
    /// - `name` present, a string, non-empty
    /// - `name` not seen anywhere earlier in this payload
    /// - `children`, when present, is an array
    pub fn validate_tree(payload: &Value) -> Result<(), CategoryServiceError> {
        let mut seen_names = HashSet::new();
        Self::validate_node(payload, &mut seen_names)
    }

    fn validate_node(
        node: &Value,
        seen_names: &mut HashSet<String>,
    ) -> Result<(), CategoryServiceError> {
        let obj = node
            .as_object()
            .ok_or_else(|| CategoryServiceError::invalid_payload("category must be a JSON object"))?;

        let unknown: Vec<String> = obj
            .keys()
            .filter(|key| !ALLOWED_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(CategoryServiceError::unknown_fields(unknown));
        }

        let name = match obj.get("name") {
            None | Some(Value::Null) => return Err(CategoryServiceError::missing_field("name")),
            Some(Value::String(name)) if name.is_empty() => {
                return Err(CategoryServiceError::missing_field("name"))
            }
            Some(Value::String(name)) => name,
            Some(_) => {
                return Err(CategoryServiceError::invalid_payload("name must be a string"))
            }
        };

        if !seen_names.insert(name.clone()) {
            return Err(CategoryServiceError::DuplicateNameInRequest { name: name.clone() });
        }

        match obj.get("children") {
            None => Ok(()),
            Some(Value::Array(children)) => {
                for child in children {
                    Self::validate_node(child, seen_names)?;
                }
                Ok(())
            }
            Some(_) => Err(CategoryServiceError::invalid_payload(
                "children must be an array",
            )),
        }
    }

    /// Recursively insert a validated payload, returning the new node's id.
    ///
    /// Pre-order: the current node is created first so children can link to
    /// its assigned id. A UNIQUE violation here means the payload raced past
    /// validation and is surfaced as a store-level duplicate.
    fn build_node<'a>(&'a self, node: &'a Value, parent_id: Option<String>) -> BoxedResult<'a, String> {
        Box::pin(async move {
            // Shape guaranteed by validate_tree; re-checked cheaply since
            // this walks the raw payload a second time.
            let obj = node.as_object().ok_or_else(|| {
                CategoryServiceError::invalid_payload("category must be a JSON object")
            })?;
            let name = obj.get("name").and_then(Value::as_str).ok_or_else(|| {
                CategoryServiceError::missing_field("name")
            })?;

            let category = Category::new(name.to_string(), parent_id);
            self.store.insert(&category).await.map_err(|e| match e {
                DatabaseError::NameConflict { name } => {
                    CategoryServiceError::DuplicateNameInStore { name }
                }
                other => CategoryServiceError::Database(other),
            })?;

            if let Some(children) = obj.get("children").and_then(Value::as_array) {
                for child in children {
                    self.build_node(child, Some(category.id.clone())).await?;
                }
            }

            Ok(category.id)
        })
    }

    /// Recursively assemble the nested representation rooted at `id`.
    ///
    /// Depth-first, pre-order, children in creation order, so repeated
    /// calls over the same stored state produce identical output. Leaves
    /// carry an explicit empty `children` list.
    pub fn read_tree<'a>(&'a self, id: &'a str) -> BoxedResult<'a, CategoryTree> {
        Box::pin(async move {
            let category = self
                .store
                .get(id)
                .await?
                .ok_or_else(|| CategoryServiceError::not_found(id))?;

            let mut children = Vec::new();
            for child in self.store.children_of(Some(id)).await? {
                children.push(self.read_tree(&child.id).await?);
            }

            Ok(CategoryTree {
                id: category.id,
                name: category.name,
                children,
            })
        })
    }

    /// Assemble the flat item view for a single category.
    ///
    /// `parents` is collected by repeated upward traversal, so it is ordered
    /// nearest-parent-first with the root last.
    pub async fn read_item(&self, id: &str) -> Result<CategoryItem, CategoryServiceError> {
        let category = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| CategoryServiceError::not_found(id))?;

        let mut parents = Vec::new();
        let mut current_parent = category.parent_id.clone();
        while let Some(parent_id) = current_parent {
            // A dangling parent_id cannot occur through this API: deletes
            // are all-or-nothing and the schema nulls child references.
            let Some(parent) = self.store.get(&parent_id).await? else {
                break;
            };
            parents.push(parent.summary());
            current_parent = parent.parent_id;
        }

        let children = self
            .store
            .children_of(Some(id))
            .await?
            .iter()
            .map(Category::summary)
            .collect();

        let siblings = self
            .store
            .siblings_of(category.parent_id.as_deref(), id)
            .await?
            .iter()
            .map(Category::summary)
            .collect();

        Ok(CategoryItem {
            id: category.id,
            name: category.name,
            parents,
            children,
            siblings,
        })
    }

    /// Replace the whole tree with the given payload.
    ///
    /// Validates the entire payload first; on any validation failure the
    /// store is left untouched. On success: delete all rows, rebuild from
    /// the payload root, and return the freshly-read nested tree.
    pub async fn replace_tree(&self, payload: &Value) -> Result<CategoryTree, CategoryServiceError> {
        Self::validate_tree(payload)?;

        let removed = self.store.delete_all().await?;
        tracing::info!(removed, "Replacing category tree");

        let root_id = self.build_node(payload, None).await?;
        self.read_tree(&root_id).await
    }

    /// Fetch the current tree, or `None` when the store is empty.
    pub async fn fetch_tree(&self) -> Result<Option<CategoryTree>, CategoryServiceError> {
        match self.store.root().await? {
            Some(root) => Ok(Some(self.read_tree(&root.id).await?)),
            None => Ok(None),
        }
    }

    /// Delete all categories unconditionally. Idempotent.
    pub async fn clear_all(&self) -> Result<u64, CategoryServiceError> {
        let removed = self.store.delete_all().await?;
        tracing::info!(removed, "Cleared category tree");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn create_test_service() -> (CategoryService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(DatabaseService::new(db_path).await.unwrap());
        (CategoryService::new(db), temp_dir)
    }

    fn sample_payload() -> Value {
        json!({
            "name": "Electronics",
            "children": [
                {
                    "name": "Computers",
                    "children": [
                        { "name": "Laptops" },
                        { "name": "Desktops" }
                    ]
                },
                { "name": "Phones" }
            ]
        })
    }

    fn tree_names(tree: &CategoryTree) -> Vec<String> {
        let mut names = vec![tree.name.clone()];
        for child in &tree.children {
            names.extend(tree_names(child));
        }
        names
    }

    #[tokio::test]
    async fn replace_then_fetch_is_isomorphic_to_input() {
        let (service, _temp_dir) = create_test_service().await;

        let replaced = service.replace_tree(&sample_payload()).await.unwrap();
        assert_eq!(replaced.name, "Electronics");
        assert_eq!(replaced.children.len(), 2);
        assert_eq!(replaced.children[0].name, "Computers");
        assert_eq!(replaced.children[1].name, "Phones");

        let laptops = &replaced.children[0].children;
        assert_eq!(laptops.len(), 2);
        assert_eq!(laptops[0].name, "Laptops");
        assert_eq!(laptops[1].name, "Desktops");
        assert!(laptops[0].children.is_empty());

        // The tree returned by replace equals a subsequent fetch
        let fetched = service.fetch_tree().await.unwrap().unwrap();
        assert_eq!(fetched, replaced);
    }

    #[tokio::test]
    async fn replace_assigns_fresh_ids() {
        let (service, _temp_dir) = create_test_service().await;

        let first = service.replace_tree(&sample_payload()).await.unwrap();
        let second = service.replace_tree(&sample_payload()).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(tree_names(&first), tree_names(&second));
    }

    #[tokio::test]
    async fn duplicate_name_in_request_rejected_and_store_unchanged() {
        let (service, _temp_dir) = create_test_service().await;

        service.replace_tree(&sample_payload()).await.unwrap();

        let payload = json!({
            "name": "Clothing",
            "children": [
                { "name": "Shoes" },
                { "name": "Shoes" }
            ]
        });

        let err = service.replace_tree(&payload).await.unwrap_err();
        assert!(
            matches!(err, CategoryServiceError::DuplicateNameInRequest { ref name } if name == "Shoes")
        );

        // The prior tree survives intact
        let fetched = service.fetch_tree().await.unwrap().unwrap();
        assert_eq!(fetched.name, "Electronics");
    }

    #[tokio::test]
    async fn duplicate_name_across_levels_rejected() {
        let (service, _temp_dir) = create_test_service().await;

        let payload = json!({
            "name": "Root",
            "children": [
                {
                    "name": "A",
                    "children": [ { "name": "Root" } ]
                }
            ]
        });

        let err = service.replace_tree(&payload).await.unwrap_err();
        assert!(matches!(
            err,
            CategoryServiceError::DuplicateNameInRequest { .. }
        ));
        assert!(service.fetch_tree().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_name_rejected() {
        let (service, _temp_dir) = create_test_service().await;

        let payload = json!({
            "name": "Root",
            "children": [ { "children": [] } ]
        });

        let err = service.replace_tree(&payload).await.unwrap_err();
        assert!(matches!(err, CategoryServiceError::MissingField { ref field } if field == "name"));
        assert!(service.fetch_tree().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_name_rejected() {
        let (service, _temp_dir) = create_test_service().await;

        let payload = json!({ "name": "" });
        let err = service.replace_tree(&payload).await.unwrap_err();
        assert!(matches!(err, CategoryServiceError::MissingField { .. }));
    }

    #[tokio::test]
    async fn unknown_field_rejected_and_named() {
        let (service, _temp_dir) = create_test_service().await;

        let payload = json!({
            "name": "Root",
            "children": [ { "name": "A", "color": "red" } ]
        });

        let err = service.replace_tree(&payload).await.unwrap_err();
        match err {
            CategoryServiceError::UnknownFields { keys } => {
                assert_eq!(keys, vec!["color".to_string()]);
            }
            other => panic!("expected UnknownFields, got {:?}", other),
        }
        assert!(service.fetch_tree().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_string_name_rejected() {
        let (service, _temp_dir) = create_test_service().await;

        let payload = json!({ "name": 42 });
        let err = service.replace_tree(&payload).await.unwrap_err();
        assert!(matches!(err, CategoryServiceError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn non_array_children_rejected() {
        let (service, _temp_dir) = create_test_service().await;

        let payload = json!({ "name": "Root", "children": "oops" });
        let err = service.replace_tree(&payload).await.unwrap_err();
        assert!(matches!(err, CategoryServiceError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn read_item_unknown_id_is_not_found() {
        let (service, _temp_dir) = create_test_service().await;

        let err = service.read_item("missing-id").await.unwrap_err();
        assert!(
            matches!(err, CategoryServiceError::CategoryNotFound { ref id } if id == "missing-id")
        );
    }

    #[tokio::test]
    async fn item_view_relations() {
        let (service, _temp_dir) = create_test_service().await;

        // root -> [A, B], A -> [C]
        let payload = json!({
            "name": "root",
            "children": [
                { "name": "A", "children": [ { "name": "C" } ] },
                { "name": "B" }
            ]
        });
        let tree = service.replace_tree(&payload).await.unwrap();
        let a = &tree.children[0];
        let b = &tree.children[1];
        let c = &a.children[0];

        // C's parents: nearest first (A, then root)
        let item_c = service.read_item(&c.id).await.unwrap();
        let parent_names: Vec<&str> = item_c.parents.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(parent_names, vec!["A", "root"]);
        assert!(item_c.children.is_empty());
        assert!(item_c.siblings.is_empty());

        // A's children and siblings
        let item_a = service.read_item(&a.id).await.unwrap();
        assert_eq!(item_a.children.len(), 1);
        assert_eq!(item_a.children[0].name, "C");
        assert_eq!(item_a.siblings.len(), 1);
        assert_eq!(item_a.siblings[0].name, "B");
        assert_eq!(item_a.parents.len(), 1);
        assert_eq!(item_a.parents[0].name, "root");

        // Root has no parents and no siblings
        let item_root = service.read_item(&tree.id).await.unwrap();
        assert!(item_root.parents.is_empty());
        assert!(item_root.siblings.is_empty());
        assert_eq!(item_root.children.len(), 2);

        // B's sibling is A
        let item_b = service.read_item(&b.id).await.unwrap();
        assert_eq!(item_b.siblings.len(), 1);
        assert_eq!(item_b.siblings[0].name, "A");
    }

    #[tokio::test]
    async fn clear_is_idempotent_and_empties_the_tree() {
        let (service, _temp_dir) = create_test_service().await;

        service.replace_tree(&sample_payload()).await.unwrap();
        assert!(service.fetch_tree().await.unwrap().is_some());

        let removed = service.clear_all().await.unwrap();
        assert_eq!(removed, 5);
        assert!(service.fetch_tree().await.unwrap().is_none());

        let removed = service.clear_all().await.unwrap();
        assert_eq!(removed, 0);
        assert!(service.fetch_tree().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_on_empty_store_is_none() {
        let (service, _temp_dir) = create_test_service().await;
        assert!(service.fetch_tree().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn single_node_payload_round_trips() {
        let (service, _temp_dir) = create_test_service().await;

        let tree = service.replace_tree(&json!({ "name": "Solo" })).await.unwrap();
        assert_eq!(tree.name, "Solo");
        assert!(tree.children.is_empty());

        let item = service.read_item(&tree.id).await.unwrap();
        assert!(item.parents.is_empty());
        assert!(item.children.is_empty());
        assert!(item.siblings.is_empty());
    }

    #[tokio::test]
    async fn validate_tree_rejects_non_object_payload() {
        let err = CategoryService::validate_tree(&json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, CategoryServiceError::InvalidPayload(_)));
    }
}
