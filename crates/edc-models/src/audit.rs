//! Audit log entries
//!
//! Collection: audit_logs. Entries are written once and never updated.

use chrono::{DateTime, Utc};
use edc_core::traits::{new_id, Entity, Id, Identifiable, UserContext};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional area an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditModule {
    Auth,
    Projects,
    Marches,
    Milestones,
    Documents,
    Execution,
    Trash,
    Library,
    Users,
    ReferenceData,
    Import,
    Export,
}

impl AuditModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Projects => "projects",
            Self::Marches => "marches",
            Self::Milestones => "milestones",
            Self::Documents => "documents",
            Self::Execution => "execution",
            Self::Trash => "trash",
            Self::Library => "library",
            Self::Users => "users",
            Self::ReferenceData => "reference_data",
            Self::Import => "import",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for AuditModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Id,
    pub timestamp: DateTime<Utc>,
    pub user_name: String,
    pub role: String,
    pub module: AuditModule,
    pub action: String,
    pub detail: String,
}

impl Identifiable for AuditEntry {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for AuditEntry {
    const COLLECTION: &'static str = "audit_logs";
    const TYPE_NAME: &'static str = "AuditEntry";
}

impl AuditEntry {
    pub fn new<U: UserContext + ?Sized>(
        user: &U,
        module: AuditModule,
        action: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            timestamp: Utc::now(),
            user_name: user.display_name().to_string(),
            role: user.role_label().to_string(),
            module,
            action: action.into(),
            detail: detail.into(),
        }
    }
}
