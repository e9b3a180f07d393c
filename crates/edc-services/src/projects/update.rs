//! Update Service for Projects

use edc_contracts::projects::UpdateProjectContract;
use edc_contracts::{merge_validator_errors, require_capability, Contract};
use edc_core::error::ValidationErrors;
use edc_core::traits::{Id, UserContext};
use edc_core::types::Capability;
use edc_core::{EdcError, EdcResult};
use edc_models::{AuditModule, DocumentRef, Project, UpdateProjectDto};
use validator::Validate;

use crate::context::ServiceContext;
use crate::result::ServiceResult;

pub struct UpdateProjectService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> UpdateProjectService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, id: Id, dto: UpdateProjectDto) -> ServiceResult<Project> {
        self.perform(id, dto).await.into()
    }

    async fn perform(&self, id: Id, dto: UpdateProjectDto) -> EdcResult<Project> {
        let contract = UpdateProjectContract::new(self.user);
        contract.authorize()?;

        let mut project = self.ctx.projects.get(id).await?;
        let mut errors = ValidationErrors::new();
        merge_validator_errors(&mut errors, dto.validate());
        dto.apply_to(&mut project);
        if let Err(contract_errors) = contract.validate(&project) {
            errors.merge(contract_errors);
        }
        errors.into_result()?;

        self.ctx.projects.save(&project).await?;
        self.ctx
            .audit
            .log(self.user, AuditModule::Projects, "update", project.name.clone());
        Ok(project)
    }
}

/// Attach or remove the signed procurement plan of a project
pub struct SignedPlanService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> SignedPlanService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn attach(self, id: Id, file_name: &str, content: &str) -> ServiceResult<Project> {
        self.perform_attach(id, file_name, content).await.into()
    }

    pub async fn remove(self, id: Id) -> ServiceResult<Project> {
        self.perform_remove(id).await.into()
    }

    pub async fn download(self, id: Id) -> EdcResult<DocumentRef> {
        require_capability(self.user, Capability::Download, "download documents")?;
        self.ctx
            .projects
            .get(id)
            .await?
            .signed_plan
            .ok_or_else(|| EdcError::not_found("Document", "project", id))
    }

    async fn perform_attach(&self, id: Id, file_name: &str, content: &str) -> EdcResult<Project> {
        let contract = UpdateProjectContract::new(self.user);
        contract.authorize()?;

        let mut project = self.ctx.projects.get(id).await?;
        let document = DocumentRef::from_data_uri(file_name, content, self.user.display_name())?;
        let detail = format!("{}: {}", project.name, document.file_name);
        project.signed_plan = Some(document);
        project.touch();
        contract.check(&project)?;

        self.ctx.projects.save(&project).await?;
        self.ctx
            .audit
            .log(self.user, AuditModule::Documents, "attach_signed_plan", detail);
        Ok(project)
    }

    async fn perform_remove(&self, id: Id) -> EdcResult<Project> {
        UpdateProjectContract::new(self.user).authorize()?;

        let mut project = self.ctx.projects.get(id).await?;
        if project.signed_plan.take().is_none() {
            return Err(EdcError::not_found("Document", "slot", "signed_plan"));
        }
        project.touch();

        self.ctx.projects.save(&project).await?;
        self.ctx.audit.log(
            self.user,
            AuditModule::Documents,
            "remove_signed_plan",
            project.name.clone(),
        );
        Ok(project)
    }
}
