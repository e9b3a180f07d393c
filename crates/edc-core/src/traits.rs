//! Core traits shared by models, contracts, services and the store

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::Capability;

/// Primary key type. Records are keyed by opaque identifiers.
pub type Id = Uuid;

/// Generate a fresh identifier
pub fn new_id() -> Id {
    Uuid::new_v4()
}

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Id;
}

/// Trait for entities with timestamps (created_at, updated_at)
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Trait for soft-deletable entities
pub trait SoftDeletable {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// Trait for entities that belong to a project
pub trait ProjectScoped {
    fn project_id(&self) -> Id;
}

/// Base trait for all persisted domain entities
pub trait Entity: Identifiable + Send + Sync {
    /// The store collection name
    const COLLECTION: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}

/// User context for permission checks
///
/// Implemented by the authenticated user type and by test doubles.
pub trait UserContext: Send + Sync {
    fn user_id(&self) -> Id;
    /// Display name recorded in audit entries
    fn display_name(&self) -> &str;
    /// Role label recorded in audit entries
    fn role_label(&self) -> &str;
    fn is_anonymous(&self) -> bool;
    fn is_logged_in(&self) -> bool {
        !self.is_anonymous()
    }
    /// Check a capability against the user's role
    fn allowed(&self, capability: Capability) -> bool;
}
