//! Execution record service
//!
//! Contract reference, delivery documents, décomptes, avenants and the
//! termination procedure. Only available while the execution phase is open.

use chrono::NaiveDate;
use edc_contracts::marches::UpdateMarcheContract;
use edc_contracts::Contract;
use edc_core::error::ValidationErrors;
use edc_core::traits::{Id, UserContext};
use edc_core::EdcResult;
use edc_models::{
    AuditModule, Avenant, ContractRef, Decompte, DocumentRef, Marche, MilestoneGroup,
    TerminationStage,
};
use serde::Deserialize;

use crate::context::ServiceContext;
use crate::result::ServiceResult;

#[derive(Debug, Clone, Deserialize)]
pub struct TerminationRequest {
    pub stage: TerminationStage,
    pub date: NaiveDate,
    pub reason: Option<String>,
}

pub struct ExecutionService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> ExecutionService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn set_contract(self, id: Id, contract: ContractRef) -> ServiceResult<Marche> {
        self.mutate(id, "set_contract", move |m| {
            let detail = format!("contract {} ({})", contract.numero, contract.titulaire);
            m.execution.contract = Some(contract);
            Ok(detail)
        })
        .await
        .into()
    }

    pub async fn add_delivery_document(self, id: Id, file_name: &str, content: &str) -> ServiceResult<Marche> {
        let uploaded_by = self.user.display_name().to_string();
        self.mutate(id, "add_delivery_document", |m| {
            let document = DocumentRef::from_data_uri(file_name, content, uploaded_by)?;
            let detail = format!("delivery document {}", document.file_name);
            m.execution.delivery_documents.push(document);
            Ok(detail)
        })
        .await
        .into()
    }

    pub async fn add_decompte(self, id: Id, decompte: Decompte) -> ServiceResult<Marche> {
        self.mutate(id, "add_decompte", move |m| {
            let detail = format!("décompte n°{} ({})", decompte.numero, decompte.montant);
            m.execution.add_decompte(decompte)?;
            Ok(detail)
        })
        .await
        .into()
    }

    pub async fn set_decompte_paid(self, id: Id, numero: u32, paye: bool) -> ServiceResult<Marche> {
        self.mutate(id, "set_decompte_paid", move |m| {
            m.execution.set_decompte_paid(numero, paye)?;
            Ok(format!("décompte n°{} paid = {}", numero, paye))
        })
        .await
        .into()
    }

    pub async fn remove_decompte(self, id: Id, numero: u32) -> ServiceResult<Marche> {
        self.mutate(id, "remove_decompte", move |m| {
            m.execution.remove_decompte(numero)?;
            Ok(format!("décompte n°{}", numero))
        })
        .await
        .into()
    }

    pub async fn add_avenant(self, id: Id, avenant: Avenant) -> ServiceResult<Marche> {
        self.mutate(id, "add_avenant", move |m| {
            let detail = format!("avenant n°{}: {}", avenant.numero, avenant.objet);
            m.execution.add_avenant(avenant)?;
            Ok(detail)
        })
        .await
        .into()
    }

    pub async fn remove_avenant(self, id: Id, numero: u32) -> ServiceResult<Marche> {
        self.mutate(id, "remove_avenant", move |m| {
            m.execution.remove_avenant(numero)?;
            Ok(format!("avenant n°{}", numero))
        })
        .await
        .into()
    }

    pub async fn advance_termination(self, id: Id, request: TerminationRequest) -> ServiceResult<Marche> {
        self.mutate(id, "advance_termination", move |m| {
            m.execution
                .advance_termination(request.stage, request.date, request.reason)?;
            Ok(format!("termination {} on {}", request.stage.as_str(), request.date))
        })
        .await
        .into()
    }

    async fn mutate<F>(&self, id: Id, action: &str, change: F) -> EdcResult<Marche>
    where
        F: FnOnce(&mut Marche) -> EdcResult<String>,
    {
        let contract = UpdateMarcheContract::new(self.user, None);
        contract.authorize()?;

        let mut marche = self.ctx.marches.get(id).await?;
        if !marche.is_phase_accessible(MilestoneGroup::Execution) {
            let mut errors = ValidationErrors::new();
            errors.add_base("The execution phase is closed for this marché");
            return Err(errors.into());
        }

        let detail = change(&mut marche)?;
        marche.touch();
        contract.check(&marche)?;

        self.ctx.marches.save(&marche).await?;
        self.ctx.audit.log(
            self.user,
            AuditModule::Execution,
            action,
            format!("{}: {}", marche.numero_dossier, detail),
        );
        Ok(marche)
    }
}
