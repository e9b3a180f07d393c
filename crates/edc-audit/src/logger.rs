//! Audit log emitter and reader

use edc_core::traits::UserContext;
use edc_core::EdcResult;
use edc_models::{AuditEntry, AuditModule};
use edc_store::{Repository, SharedStore};
use tokio::task::JoinHandle;

use crate::query::AuditQuery;

/// Entries returned by a read when nothing else is configured
pub const DEFAULT_WINDOW: usize = 200;

#[derive(Clone)]
pub struct AuditLogger {
    entries: Repository<AuditEntry>,
    window: usize,
}

impl AuditLogger {
    pub fn new(store: SharedStore) -> Self {
        Self::with_window(store, DEFAULT_WINDOW)
    }

    pub fn with_window(store: SharedStore, window: usize) -> Self {
        Self {
            entries: Repository::new(store),
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Append an entry in the background. Failures are logged only.
    pub fn record(&self, entry: AuditEntry) -> JoinHandle<()> {
        let entries = self.entries.clone();
        tokio::spawn(async move {
            if let Err(e) = entries.save(&entry).await {
                tracing::warn!(
                    module = %entry.module,
                    action = %entry.action,
                    error = %e,
                    "audit entry dropped"
                );
            }
        })
    }

    /// Build and append an entry for `user`
    pub fn log<U: UserContext + ?Sized>(
        &self,
        user: &U,
        module: AuditModule,
        action: impl Into<String>,
        detail: impl Into<String>,
    ) -> JoinHandle<()> {
        let entry = AuditEntry::new(user, module, action, detail);
        tracing::debug!(
            user = %entry.user_name,
            module = %entry.module,
            action = %entry.action,
            "audit"
        );
        self.record(entry)
    }

    /// Append an entry and wait for the store
    pub async fn record_now(&self, entry: AuditEntry) -> EdcResult<()> {
        self.entries.save(&entry).await
    }

    /// Most recent entries, newest first, at most `window` of them
    pub async fn recent(&self) -> EdcResult<Vec<AuditEntry>> {
        self.query(&AuditQuery::default()).await
    }

    pub async fn query(&self, query: &AuditQuery) -> EdcResult<Vec<AuditEntry>> {
        let mut entries = self.entries.filter(|e| query.matches(e)).await?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        entries.truncate(query.effective_limit(self.window));
        Ok(entries)
    }
}
