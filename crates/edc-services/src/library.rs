//! Library services
//!
//! Shared documents not tied to a marché. Listing returns metadata only;
//! the payload is served through [`download_library_document`].

use edc_contracts::library::{CreateLibraryDocumentContract, DeleteLibraryDocumentContract};
use edc_contracts::{merge_validator_errors, require_capability, Contract};
use edc_core::error::ValidationErrors;
use edc_core::traits::{Id, UserContext};
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::{AuditModule, CreateLibraryDocumentDto, DocumentRef, LibraryCategory, LibraryDocument};
use validator::Validate;

use crate::context::{can_read_payloads, require_login, ServiceContext};
use crate::result::ServiceResult;

/// Newest first, optionally restricted to one category
pub async fn list_library<U: UserContext>(
    ctx: &ServiceContext,
    user: &U,
    category: Option<LibraryCategory>,
) -> EdcResult<Vec<LibraryDocument>> {
    require_login(user)?;
    let mut docs = ctx
        .library
        .filter(|d| category.map_or(true, |c| d.category == c))
        .await?;
    docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if !can_read_payloads(user) {
        docs.iter_mut().for_each(|d| d.document.redact());
    }
    Ok(docs)
}

pub async fn get_library_document<U: UserContext>(
    ctx: &ServiceContext,
    user: &U,
    id: Id,
) -> EdcResult<LibraryDocument> {
    require_login(user)?;
    let mut doc = ctx.library.get(id).await?;
    if !can_read_payloads(user) {
        doc.document.redact();
    }
    Ok(doc)
}

pub async fn download_library_document<U: UserContext>(
    ctx: &ServiceContext,
    user: &U,
    id: Id,
) -> EdcResult<DocumentRef> {
    require_capability(user, Capability::Download, "download documents")?;
    let doc = ctx.library.get(id).await?;
    tracing::debug!(document_id = %id, file = %doc.document.file_name, "library download");
    Ok(doc.document)
}

pub struct CreateLibraryDocumentService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> CreateLibraryDocumentService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, dto: CreateLibraryDocumentDto) -> ServiceResult<LibraryDocument> {
        self.perform(dto).await.into()
    }

    async fn perform(&self, dto: CreateLibraryDocumentDto) -> EdcResult<LibraryDocument> {
        let contract = CreateLibraryDocumentContract::new(self.user);
        contract.authorize()?;

        let mut errors = ValidationErrors::new();
        merge_validator_errors(&mut errors, dto.validate());
        errors.into_result()?;

        let document = DocumentRef::from_data_uri(
            dto.file_name.trim(),
            &dto.content,
            self.user.display_name(),
        )?;
        let record = LibraryDocument::new(dto.title.trim(), dto.category, document);
        contract.validate(&record)?;

        self.ctx.library.save(&record).await?;
        tracing::info!(document_id = %record.id, title = %record.title, "library document published");
        self.ctx.audit.log(
            self.user,
            AuditModule::Library,
            "create",
            format!("{} ({})", record.title, record.document.file_name),
        );
        Ok(record)
    }
}

pub struct DeleteLibraryDocumentService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> DeleteLibraryDocumentService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, id: Id) -> ServiceResult<LibraryDocument> {
        self.perform(id).await.into()
    }

    async fn perform(&self, id: Id) -> EdcResult<LibraryDocument> {
        let contract = DeleteLibraryDocumentContract::new(self.user);
        contract.authorize()?;
        let record = self.ctx.library.get(id).await?;
        contract.validate(&record)?;

        self.ctx.library.delete(id).await?;
        tracing::info!(document_id = %id, "library document removed");
        self.ctx
            .audit
            .log(self.user, AuditModule::Library, "delete", record.title.clone());
        Ok(record)
    }
}
