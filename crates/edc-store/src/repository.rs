//! Typed access to one collection
//!
//! A [`Repository`] binds an [`Entity`] type to its collection and does the
//! JSON conversions, returning domain errors.

use edc_core::traits::{Entity, Id};
use edc_core::{EdcError, EdcResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;

use crate::error::StoreError;
use crate::store::SharedStore;

pub struct Repository<T> {
    store: SharedStore,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Find by id, `None` when absent
    pub async fn find(&self, id: Id) -> EdcResult<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(value) => Ok(Some(decode(value)?)),
            None => Ok(None),
        }
    }

    /// Find by id, 404 when absent
    pub async fn get(&self, id: Id) -> EdcResult<T> {
        self.find(id)
            .await?
            .ok_or_else(|| EdcError::not_found(T::TYPE_NAME, "id", id))
    }

    /// Every decodable record of the collection
    pub async fn all(&self) -> EdcResult<Vec<T>> {
        let values = self.store.list(T::COLLECTION).await?;
        let mut records = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<T>(value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(collection = T::COLLECTION, error = %e, "skipping undecodable document")
                }
            }
        }
        Ok(records)
    }

    /// Records matching `predicate`
    pub async fn filter<F>(&self, predicate: F) -> EdcResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.all().await?.into_iter().filter(|r| predicate(r)).collect())
    }

    /// Insert or replace the whole record
    pub async fn save(&self, record: &T) -> EdcResult<()> {
        let value = serde_json::to_value(record).map_err(StoreError::from)?;
        self.store.upsert(T::COLLECTION, record.id(), value).await?;
        Ok(())
    }

    /// Overwrite top-level fields and return the merged record
    pub async fn merge(&self, id: Id, fields: Map<String, Value>) -> EdcResult<T> {
        match self.store.merge(T::COLLECTION, id, fields).await {
            Ok(value) => decode(value),
            Err(StoreError::NotFound { .. }) => Err(EdcError::not_found(T::TYPE_NAME, "id", id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a record; 404 when absent
    pub async fn delete(&self, id: Id) -> EdcResult<()> {
        if self.store.delete(T::COLLECTION, id).await? {
            Ok(())
        } else {
            Err(EdcError::not_found(T::TYPE_NAME, "id", id))
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> EdcResult<T> {
    serde_json::from_value(value).map_err(|e| EdcError::from(StoreError::from(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use edc_core::traits::Identifiable;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Id,
        text: String,
        pinned: bool,
    }

    impl Identifiable for Note {
        fn id(&self) -> Id {
            self.id
        }
    }

    impl Entity for Note {
        const COLLECTION: &'static str = "notes";
        const TYPE_NAME: &'static str = "Note";
    }

    fn repo() -> Repository<Note> {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    fn note(text: &str) -> Note {
        Note { id: Uuid::new_v4(), text: text.into(), pinned: false }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let repo = repo();
        let n = note("hello");
        repo.save(&n).await.unwrap();
        assert_eq!(repo.get(n.id).await.unwrap(), n);
        assert_eq!(repo.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = repo().get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert!(err.to_string().contains("Note"));
    }

    #[tokio::test]
    async fn test_merge_returns_typed_record() {
        let repo = repo();
        let n = note("hello");
        repo.save(&n).await.unwrap();

        let mut fields = Map::new();
        fields.insert("pinned".into(), json!(true));
        let merged = repo.merge(n.id, fields).await.unwrap();
        assert!(merged.pinned);
        assert_eq!(merged.text, "hello");

        let missing = repo.merge(Uuid::new_v4(), Map::new()).await.unwrap_err();
        assert_eq!(missing.status_code(), 404);
    }

    #[tokio::test]
    async fn test_undecodable_documents_are_skipped() {
        let repo = repo();
        repo.save(&note("ok")).await.unwrap();
        repo.store()
            .upsert("notes", Uuid::new_v4(), json!({"garbage": true}))
            .await
            .unwrap();
        assert_eq!(repo.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_filter_and_delete() {
        let repo = repo();
        let mut pinned = note("a");
        pinned.pinned = true;
        repo.save(&pinned).await.unwrap();
        repo.save(&note("b")).await.unwrap();

        assert_eq!(repo.filter(|n| n.pinned).await.unwrap(), vec![pinned.clone()]);
        repo.delete(pinned.id).await.unwrap();
        assert_eq!(repo.delete(pinned.id).await.unwrap_err().status_code(), 404);
    }
}
