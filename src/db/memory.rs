use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, DocumentStore, ID_FIELD};
use crate::error::{AppError, AppResult};

/// In-process store used by tests. Collections and documents keep insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<IndexMap<String, Vec<Document>>>,
    fail_introspection: bool,
    fail_storage: bool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `collection_names` always errors.
    pub fn with_failing_introspection() -> Self {
        Self {
            fail_introspection: true,
            ..Self::default()
        }
    }

    /// A store whose reads and writes always error, as if the server were unreachable.
    pub fn with_failing_storage() -> Self {
        Self {
            fail_storage: true,
            ..Self::default()
        }
    }

    fn check_reachable(&self) -> AppResult<()> {
        if self.fail_storage {
            return Err(AppError::Internal("server selection timeout".to_string()));
        }
        Ok(())
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, want)| doc.get(key) == Some(want))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, collection: &str, mut record: Document) -> AppResult<String> {
        self.check_reachable()?;
        let id = Uuid::new_v4().to_string();
        record.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(record);
        Ok(id)
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Document,
        limit: Option<u64>,
    ) -> AppResult<Vec<Document>> {
        self.check_reachable()?;
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let limit = limit.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
        Ok(docs
            .iter()
            .filter(|doc| matches(doc, filter))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, collection: &str, filter: &Document) -> AppResult<u64> {
        self.check_reachable()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map_or(0, |docs| docs.iter().filter(|doc| matches(doc, filter)).count()) as u64)
    }

    async fn collection_names(&self) -> AppResult<Vec<String>> {
        if self.fail_introspection {
            return Err(AppError::Internal(
                "listCollections not permitted for this user".to_string(),
            ));
        }
        Ok(self.collections.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn query_filters_exactly_and_honours_limit() {
        let store = MemoryDocumentStore::new();
        for category in ["Running", "Trail", "Running", "running"] {
            store
                .insert("product", doc(json!({ "category": category })))
                .await
                .unwrap();
        }

        let running = store
            .query("product", &doc(json!({ "category": "Running" })), None)
            .await
            .unwrap();
        assert_eq!(running.len(), 2);

        let first_two = store.query("product", &Document::new(), Some(2)).await.unwrap();
        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two[1]["category"], json!("Trail"));

        assert_eq!(store.count("product", &Document::new()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn unknown_collection_is_empty() {
        let store = MemoryDocumentStore::new();
        assert!(store.query("nope", &Document::new(), None).await.unwrap().is_empty());
        assert_eq!(store.count("nope", &Document::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failing_storage_errors_on_every_data_call() {
        let store = MemoryDocumentStore::with_failing_storage();
        assert!(store.insert("product", Document::new()).await.is_err());
        assert!(store.query("product", &Document::new(), None).await.is_err());
        assert!(store.count("product", &Document::new()).await.is_err());
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = MemoryDocumentStore::new();
        let a = store.insert("product", Document::new()).await.unwrap();
        let b = store.insert("product", Document::new()).await.unwrap();
        assert_ne!(a, b);
    }
}
