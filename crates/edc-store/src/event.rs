//! Change feed events

use chrono::{DateTime, Utc};
use edc_core::traits::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Upserted,
    Merged,
    Deleted,
}

/// One write, broadcast to every subscriber of the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: String,
    pub id: Id,
    pub kind: ChangeKind,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(collection: &str, id: Id, kind: ChangeKind) -> Self {
        Self {
            collection: collection.to_string(),
            id,
            kind,
            at: Utc::now(),
        }
    }
}
