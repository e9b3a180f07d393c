//! # edc-store
//!
//! Document store layer for EDC Marchés360.
//!
//! Records live in named collections of JSON documents keyed by opaque ids.
//! Two backends implement [`DocumentStore`]:
//!
//! - [`MemoryStore`]: in-process, optionally persisted to a JSON snapshot file
//! - [`PgStore`]: PostgreSQL JSONB table with `LISTEN/NOTIFY` change feed
//!
//! Writes are whole-document upserts or top-level field merges. Last write
//! wins; there is no locking or versioning.
//!
//! ## Example
//!
//! ```ignore
//! use edc_store::{MemoryStore, Repository};
//! use edc_models::Marche;
//!
//! let store = Arc::new(MemoryStore::new());
//! let marches: Repository<Marche> = Repository::new(store.clone());
//! let marche = marches.get(id).await?;
//! ```

pub mod error;
pub mod event;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use event::{ChangeEvent, ChangeKind};
pub use memory::MemoryStore;
pub use postgres::{PgStore, PgStoreConfig};
pub use repository::Repository;
pub use store::{DocumentStore, SharedStore};
