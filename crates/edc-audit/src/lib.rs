//! # edc-audit
//!
//! Append-only audit log for EDC Marchés360.
//!
//! Services hand an [`AuditEntry`](edc_models::AuditEntry) to the
//! [`AuditLogger`] after a mutation succeeds. Writes run on a spawned task;
//! a failed write is logged and never reaches the action that caused it.
//! Reads return the most recent entries, newest first, capped to a window.

pub mod logger;
pub mod query;

pub use logger::{AuditLogger, DEFAULT_WINDOW};
pub use query::AuditQuery;
