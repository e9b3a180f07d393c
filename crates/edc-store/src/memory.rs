//! In-memory document store
//!
//! Documents live in a `parking_lot::RwLock`. With a snapshot path, the
//! whole store is rewritten to a JSON file after every write and reloaded
//! on open.

use async_trait::async_trait;
use edc_core::traits::Id;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::{broadcast, Mutex};

use crate::error::{StoreError, StoreResult};
use crate::event::{ChangeEvent, ChangeKind};
use crate::store::{DocumentStore, CHANGE_FEED_CAPACITY};

type Collections = HashMap<String, BTreeMap<Id, Value>>;

pub struct MemoryStore {
    collections: RwLock<Collections>,
    changes: broadcast::Sender<ChangeEvent>,
    snapshot_path: Option<PathBuf>,
    /// Serialises snapshot writes so the file always ends with the latest state
    snapshot_lock: Mutex<()>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// A purely in-memory store
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            collections: RwLock::new(HashMap::new()),
            changes,
            snapshot_path: None,
            snapshot_lock: Mutex::new(()),
        }
    }

    /// A store persisted to `path`, loading it when it already exists
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let collections: Collections = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        let count: usize = collections.values().map(BTreeMap::len).sum();
        tracing::info!(path = %path.display(), documents = count, "memory store opened");

        let mut store = Self::new();
        store.collections = RwLock::new(collections);
        store.snapshot_path = Some(path);
        Ok(store)
    }

    async fn persist(&self) -> StoreResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let _guard = self.snapshot_lock.lock().await;
        let bytes = {
            let collections = self.collections.read();
            serde_json::to_vec_pretty(&*collections)?
        };

        // Write next to the target, then rename, so a crash never leaves half a file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "snapshot written");
        Ok(())
    }

    fn notify(&self, collection: &str, id: Id, kind: ChangeKind) {
        // No subscribers is not an error.
        let _ = self.changes.send(ChangeEvent::new(collection, id, kind));
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: Id) -> StoreResult<Option<Value>> {
        let collections = self.collections.read();
        Ok(collections.get(collection).and_then(|c| c.get(&id)).cloned())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert(&self, collection: &str, id: Id, document: Value) -> StoreResult<()> {
        if !document.is_object() {
            return Err(StoreError::InvalidDocument(format!(
                "{}/{} is not a JSON object",
                collection, id
            )));
        }
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id, document);
        tracing::debug!(collection, %id, "document upserted");

        self.persist().await?;
        self.notify(collection, id, ChangeKind::Upserted);
        Ok(())
    }

    async fn merge(&self, collection: &str, id: Id, fields: Map<String, Value>) -> StoreResult<Value> {
        let merged = {
            let mut collections = self.collections.write();
            let document = collections
                .get_mut(collection)
                .and_then(|c| c.get_mut(&id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id,
                })?;
            let object = document.as_object_mut().ok_or_else(|| {
                StoreError::InvalidDocument(format!("{}/{} is not a JSON object", collection, id))
            })?;
            object.extend(fields);
            document.clone()
        };
        tracing::debug!(collection, %id, "document merged");

        self.persist().await?;
        self.notify(collection, id, ChangeKind::Merged);
        Ok(merged)
    }

    async fn delete(&self, collection: &str, id: Id) -> StoreResult<bool> {
        let removed = self
            .collections
            .write()
            .get_mut(collection)
            .and_then(|c| c.remove(&id))
            .is_some();

        if removed {
            tracing::debug!(collection, %id, "document deleted");
            self.persist().await?;
            self.notify(collection, id, ChangeKind::Deleted);
        }
        Ok(removed)
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_upsert_get_list_delete() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        store.upsert("projects", id, json!({"name": "PPM"})).await.unwrap();
        assert_eq!(
            store.get("projects", id).await.unwrap(),
            Some(json!({"name": "PPM"}))
        );
        assert_eq!(store.list("projects").await.unwrap().len(), 1);
        assert!(store.list("marches").await.unwrap().is_empty());

        assert!(store.delete("projects", id).await.unwrap());
        assert!(!store.delete("projects", id).await.unwrap());
        assert_eq!(store.get("projects", id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_merge_overwrites_top_level_fields_only() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store
            .upsert("marches", id, json!({"objet": "A", "flags": {"x": 1}, "montant": 5}))
            .await
            .unwrap();

        let mut fields = Map::new();
        fields.insert("montant".into(), json!(10));
        fields.insert("flags".into(), json!({"y": 2}));
        let merged = store.merge("marches", id, fields).await.unwrap();

        assert_eq!(merged, json!({"objet": "A", "flags": {"y": 2}, "montant": 10}));
    }

    #[tokio::test]
    async fn test_merge_missing_document() {
        let store = MemoryStore::new();
        let err = store
            .merge("marches", Uuid::new_v4(), Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_non_object_documents_are_rejected() {
        let store = MemoryStore::new();
        assert!(store.upsert("x", Uuid::new_v4(), json!([1, 2])).await.is_err());
    }

    #[tokio::test]
    async fn test_change_feed() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe();
        let id = Uuid::new_v4();

        store.upsert("library", id, json!({})).await.unwrap();
        store.delete("library", id).await.unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, ChangeKind::Upserted);
        assert_eq!(first.collection, "library");
        assert_eq!(rx.recv().await.unwrap().kind, ChangeKind::Deleted);
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let id = Uuid::new_v4();

        {
            let store = MemoryStore::open(&path).await.unwrap();
            store.upsert("projects", id, json!({"name": "PPM"})).await.unwrap();
        }

        let reopened = MemoryStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("projects", id).await.unwrap(),
            Some(json!({"name": "PPM"}))
        );
    }
}
