//! The document store seam

use async_trait::async_trait;
use edc_core::traits::Id;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::StoreResult;
use crate::event::ChangeEvent;

/// Capacity of the change feed channel; slow subscribers skip ahead
pub const CHANGE_FEED_CAPACITY: usize = 256;

/// Collections of JSON documents keyed by id
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document
    async fn get(&self, collection: &str, id: Id) -> StoreResult<Option<Value>>;

    /// Every document of a collection, in no particular order
    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// Insert or replace a whole document
    async fn upsert(&self, collection: &str, id: Id, document: Value) -> StoreResult<()>;

    /// Overwrite the given top-level fields of an existing document and
    /// return the merged result
    async fn merge(&self, collection: &str, id: Id, fields: Map<String, Value>) -> StoreResult<Value>;

    /// Remove a document; `false` when it did not exist
    async fn delete(&self, collection: &str, id: Id) -> StoreResult<bool>;

    /// Subscribe to the change feed
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;

    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Check the backend is reachable
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

pub type SharedStore = Arc<dyn DocumentStore>;
