//! In-memory document backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::query::matches_all;
use super::{Collection, Condition, Document, with_id};

type Collections = HashMap<Collection, BTreeMap<String, Document>>;

/// Process-local document store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryDocumentStore {
    pub(super) async fn list(&self, collection: Collection) -> Vec<Document> {
        self.query(collection, &[]).await
    }

    pub(super) async fn get(&self, collection: Collection, id: &str) -> Option<Document> {
        let guard = self.inner.read().await;
        guard
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|data| with_id(id, data.clone()))
    }

    pub(super) async fn insert(&self, collection: Collection, id: &str, data: Document) {
        let mut guard = self.inner.write().await;
        guard
            .entry(collection)
            .or_default()
            .insert(id.to_string(), data);
    }

    pub(super) async fn update(&self, collection: Collection, id: &str, patch: Document) -> bool {
        let mut guard = self.inner.write().await;
        let Some(existing) = guard.get_mut(&collection).and_then(|docs| docs.get_mut(id)) else {
            return false;
        };
        existing.extend(patch);
        true
    }

    pub(super) async fn set_merge(&self, collection: Collection, id: &str, data: Document) {
        let mut guard = self.inner.write().await;
        guard
            .entry(collection)
            .or_default()
            .entry(id.to_string())
            .or_default()
            .extend(data);
    }

    pub(super) async fn delete(&self, collection: Collection, id: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard
            .get_mut(&collection)
            .is_some_and(|docs| docs.remove(id).is_some())
    }

    pub(super) async fn query(&self, collection: Collection, conditions: &[Condition]) -> Vec<Document> {
        let guard = self.inner.read().await;
        guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| with_id(id, data.clone()))
                    .filter(|doc| matches_all(doc, conditions))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(super) async fn count(&self, collection: Collection) -> usize {
        let guard = self.inner.read().await;
        guard.get(&collection).map_or(0, BTreeMap::len)
    }
}
