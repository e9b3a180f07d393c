//! Update Service for Marchés (descriptive fields)

use edc_contracts::marches::UpdateMarcheContract;
use edc_contracts::{merge_validator_errors, Contract};
use edc_core::error::ValidationErrors;
use edc_core::traits::{Id, UserContext};
use edc_core::EdcResult;
use edc_models::{dossier_key, AuditModule, Marche, RegistryKind, UpdateMarcheDto};
use validator::Validate;

use crate::context::ServiceContext;
use crate::reference::load_registries;
use crate::result::ServiceResult;

pub struct UpdateMarcheService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> UpdateMarcheService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, id: Id, dto: UpdateMarcheDto) -> ServiceResult<Marche> {
        self.perform(id, dto).await.into()
    }

    async fn perform(&self, id: Id, dto: UpdateMarcheDto) -> EdcResult<Marche> {
        // Only the categorical fields being changed are checked against the registries
        let touched = touched_registries(&dto);
        let registries: Vec<_> = load_registries(self.ctx)
            .await?
            .into_iter()
            .filter(|r| touched.contains(&r.kind))
            .collect();
        let contract = UpdateMarcheContract::new(self.user, Some(&registries));
        contract.authorize()?;

        let mut marche = self.ctx.marches.get(id).await?;
        let previous_numero = marche.numero_dossier.clone();

        let mut errors = ValidationErrors::new();
        merge_validator_errors(&mut errors, dto.validate());
        dto.apply_to(&mut marche);
        if let Err(contract_errors) = contract.validate(&marche) {
            errors.merge(contract_errors);
        }
        errors.into_result()?;

        if dossier_key(&marche.numero_dossier) != dossier_key(&previous_numero) {
            self.ctx
                .ensure_dossier_available(&marche.numero_dossier, Some(marche.id))
                .await?;
        }
        self.ctx.marches.save(&marche).await?;
        self.ctx.audit.log(
            self.user,
            AuditModule::Marches,
            "update",
            marche.numero_dossier.clone(),
        );
        Ok(marche)
    }
}

fn touched_registries(dto: &UpdateMarcheDto) -> Vec<RegistryKind> {
    let mut kinds = Vec::new();
    if dto.fonction.is_some() {
        kinds.push(RegistryKind::Functions);
    }
    if dto.type_ao.is_some() {
        kinds.push(RegistryKind::AoTypes);
    }
    if dto.type_prestation.is_some() {
        kinds.push(RegistryKind::PrestationTypes);
    }
    kinds
}
