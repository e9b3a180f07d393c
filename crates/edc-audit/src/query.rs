//! Audit log filters

use chrono::{DateTime, Utc};
use edc_models::{AuditEntry, AuditModule};
use serde::Deserialize;

/// Optional filters applied before the window cap
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub module: Option<AuditModule>,
    /// Case-insensitive match on the acting user's name
    pub user: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn module(module: AuditModule) -> Self {
        Self {
            module: Some(module),
            ..Default::default()
        }
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(module) = self.module {
            if entry.module != module {
                return false;
            }
        }
        if let Some(user) = &self.user {
            if !entry.user_name.eq_ignore_ascii_case(user.trim()) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if entry.timestamp < since {
                return false;
            }
        }
        true
    }

    /// Effective limit: the requested one, never above `window`
    pub fn effective_limit(&self, window: usize) -> usize {
        self.limit.map_or(window, |l| l.min(window))
    }
}
