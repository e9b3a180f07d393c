//! Create Service for Marchés

use edc_contracts::marches::CreateMarcheContract;
use edc_contracts::{merge_validator_errors, Contract};
use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::EdcResult;
use edc_models::{AuditModule, CreateMarcheDto, Marche};
use validator::Validate;

use crate::context::ServiceContext;
use crate::reference::load_registries;
use crate::result::ServiceResult;

pub struct CreateMarcheService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> CreateMarcheService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, dto: CreateMarcheDto) -> ServiceResult<Marche> {
        self.perform(dto).await.into()
    }

    async fn perform(&self, dto: CreateMarcheDto) -> EdcResult<Marche> {
        let registries = load_registries(self.ctx).await?;
        let contract = CreateMarcheContract::new(self.user, Some(&registries));
        contract.authorize()?;

        let project = self.ctx.projects.get(dto.project_id).await?;

        let mut errors = ValidationErrors::new();
        merge_validator_errors(&mut errors, dto.validate());
        let marche = dto.into_marche(
            project.funding_source,
            Some(self.user.display_name().to_string()),
        );
        if let Err(contract_errors) = contract.validate(&marche) {
            errors.merge(contract_errors);
        }
        errors.into_result()?;

        self.ctx
            .ensure_dossier_available(&marche.numero_dossier, None)
            .await?;
        self.ctx.marches.save(&marche).await?;

        tracing::info!(marche_id = %marche.id, numero = %marche.numero_dossier, "marché created");
        self.ctx.audit.log(
            self.user,
            AuditModule::Marches,
            "create",
            format!("{} - {}", marche.numero_dossier, marche.objet),
        );
        Ok(marche)
    }
}
