use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::{Connection, TransactionBehavior};

use crate::config::BuildLimits;
use crate::detail::assemble;
use crate::error::{CategoryError, CategoryResult};
use crate::store::{init_schema, open_connection, CategoryStore};
use crate::tree::build;
use crate::types::{Category, CategoryDetail, CategorySpec};

#[async_trait]
pub trait CategoryStorage: Send + Sync {
    async fn init(&self) -> CategoryResult<()>;

    /// Builds the whole tree described by `spec`, all or nothing.
    async fn create_tree(&self, spec: CategorySpec) -> CategoryResult<Category>;

    async fn category_detail(&self, id: i64) -> CategoryResult<CategoryDetail>;

    async fn count(&self) -> CategoryResult<u64>;
}

#[derive(Debug, Clone)]
pub struct SqliteCategoryStorage {
    db_path: PathBuf,
    limits: BuildLimits,
}

impl SqliteCategoryStorage {
    pub fn new(db_path: impl AsRef<Path>, limits: BuildLimits) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            limits,
        }
    }

    async fn with_connection<T, F>(&self, func: F) -> CategoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> CategoryResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = open_connection(&db_path)?;
            func(&mut connection)
        })
        .await
        .map_err(|error| CategoryError::Task(error.to_string()))?
    }
}

#[async_trait]
impl CategoryStorage for SqliteCategoryStorage {
    async fn init(&self) -> CategoryResult<()> {
        tracing::debug!(path = %self.db_path.display(), "CategoryStorage: init called");
        self.with_connection(|connection| init_schema(connection)).await
    }

    async fn create_tree(&self, spec: CategorySpec) -> CategoryResult<Category> {
        let limits = self.limits;
        let node_count = spec.node_count();

        let root = self
            .with_connection(move |connection| {
                // Immediate: the builder reads names before its first insert.
                let transaction =
                    connection.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let root = build(&*transaction, &spec, limits)?;
                transaction.commit()?;
                Ok(root)
            })
            .await?;

        tracing::info!(
            category_id = root.id,
            name = %root.name,
            created = node_count,
            "CategoryStorage: Tree created"
        );
        Ok(root)
    }

    async fn category_detail(&self, id: i64) -> CategoryResult<CategoryDetail> {
        self.with_connection(move |connection| assemble(&*connection, id))
            .await
    }

    async fn count(&self) -> CategoryResult<u64> {
        self.with_connection(|connection| connection.count()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::tempdir;

    use super::{CategoryStorage, SqliteCategoryStorage};
    use crate::config::BuildLimits;
    use crate::error::CategoryError;
    use crate::types::CategorySpec;

    fn storage(dir: &tempfile::TempDir) -> SqliteCategoryStorage {
        SqliteCategoryStorage::new(dir.path().join("categories.db"), BuildLimits::default())
    }

    #[tokio::test]
    async fn created_tree_is_retrievable_by_id() {
        let dir = tempdir().expect("temp dir");
        let storage = storage(&dir);
        storage.init().await.expect("init storage");

        let root = storage
            .create_tree(
                CategorySpec::named("A")
                    .with_children(vec![CategorySpec::named("B"), CategorySpec::named("C")]),
            )
            .await
            .expect("create tree");

        assert_eq!(storage.count().await.unwrap(), 3);

        let detail = storage.category_detail(root.id).await.expect("detail");
        assert_eq!(detail.id, root.id);
        assert_eq!(detail.name, "A");
        let kids: Vec<&str> = detail.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(kids, vec!["B", "C"]);
        assert!(detail.parents.is_empty());
        assert!(detail.siblings.is_empty());
    }

    #[tokio::test]
    async fn failed_build_rolls_back_the_whole_tree() {
        let dir = tempdir().expect("temp dir");
        let storage = storage(&dir);
        storage.init().await.expect("init storage");
        storage
            .create_tree(CategorySpec::named("taken"))
            .await
            .expect("seed");

        let spec = CategorySpec::named("A").with_children(vec![
            CategorySpec::named("B"),
            CategorySpec::named("C").with_children(vec![CategorySpec::named("taken")]),
        ]);
        let error = storage.create_tree(spec).await.unwrap_err();

        assert!(matches!(error, CategoryError::Validation { field: "name", .. }));
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_names_inside_one_request_are_rejected() {
        let dir = tempdir().expect("temp dir");
        let storage = storage(&dir);
        storage.init().await.expect("init storage");

        let spec = CategorySpec::named("A")
            .with_children(vec![CategorySpec::named("twin"), CategorySpec::named("twin")]);
        let error = storage.create_tree(spec).await.unwrap_err();

        assert!(matches!(error, CategoryError::Validation { .. }));
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_category_detail_is_not_found() {
        let dir = tempdir().expect("temp dir");
        let storage = storage(&dir);
        storage.init().await.expect("init storage");

        let error = storage.category_detail(7).await.unwrap_err();
        assert!(matches!(error, CategoryError::NotFound(7)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_creates_with_distinct_names_all_succeed() {
        let dir = tempdir().expect("temp dir");
        let storage = Arc::new(storage(&dir));
        storage.init().await.expect("init storage");

        let mut handles = Vec::new();
        for i in 0..64 {
            let storage = Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                storage
                    .create_tree(
                        CategorySpec::named(format!("root-{i}"))
                            .with_children(vec![CategorySpec::named(format!("kid-{i}"))]),
                    )
                    .await
            }));
        }

        let mut failures = Vec::new();
        for handle in handles {
            if let Err(error) = handle.await.expect("task joined") {
                failures.push(error.to_string());
            }
        }

        assert!(failures.is_empty(), "failed creates: {failures:?}");
        assert_eq!(storage.count().await.unwrap(), 128);
    }
}
