//! Create Service for Projects

use edc_contracts::projects::CreateProjectContract;
use edc_contracts::{merge_validator_errors, Contract};
use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::EdcResult;
use edc_models::{AuditModule, CreateProjectDto, Project};
use validator::Validate;

use crate::context::ServiceContext;
use crate::result::ServiceResult;

pub struct CreateProjectService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> CreateProjectService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, dto: CreateProjectDto) -> ServiceResult<Project> {
        self.perform(dto).await.into()
    }

    async fn perform(&self, dto: CreateProjectDto) -> EdcResult<Project> {
        let contract = CreateProjectContract::new(self.user);
        contract.authorize()?;

        let mut errors = ValidationErrors::new();
        merge_validator_errors(&mut errors, dto.validate());
        let project = dto.into_project(Some(self.user.display_name().to_string()));
        if let Err(contract_errors) = contract.validate(&project) {
            errors.merge(contract_errors);
        }
        errors.into_result()?;

        self.ctx.projects.save(&project).await?;
        tracing::info!(project_id = %project.id, name = %project.name, "project created");
        self.ctx.audit.log(
            self.user,
            AuditModule::Projects,
            "create",
            format!("{} ({})", project.name, project.fiscal_year),
        );
        Ok(project)
    }
}
