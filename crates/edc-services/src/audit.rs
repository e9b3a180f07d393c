//! Audit log reads

use edc_audit::AuditQuery;
use edc_contracts::require_capability;
use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::AuditEntry;

use crate::context::ServiceContext;

/// Newest first, capped by the configured window
pub async fn read_audit<U: UserContext>(
    ctx: &ServiceContext,
    user: &U,
    query: &AuditQuery,
) -> EdcResult<Vec<AuditEntry>> {
    require_capability(user, Capability::ManageUsers, "read the audit log")?;
    ctx.audit.query(query).await
}
