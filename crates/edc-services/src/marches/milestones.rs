//! Milestone date service
//!
//! Records or clears planned and realized dates. Dates in a phase closed by
//! the marché's flags are refused.

use chrono::NaiveDate;
use edc_contracts::marches::UpdateMarcheContract;
use edc_contracts::Contract;
use edc_core::error::ValidationErrors;
use edc_core::traits::{Id, UserContext};
use edc_core::{EdcError, EdcResult};
use edc_models::{AuditModule, DateKind, Marche, Milestone};

use crate::context::ServiceContext;
use crate::result::ServiceResult;

pub struct MilestoneDateService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> MilestoneDateService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    /// Set (or clear with `None`) one milestone date
    pub async fn call(
        self,
        id: Id,
        kind: DateKind,
        milestone: Milestone,
        date: Option<NaiveDate>,
    ) -> ServiceResult<Marche> {
        self.perform(id, kind, vec![(milestone, date)]).await.into()
    }

    /// Apply several dates of the same kind at once; nothing is saved if one fails
    pub async fn call_many(
        self,
        id: Id,
        kind: DateKind,
        changes: Vec<(Milestone, Option<NaiveDate>)>,
    ) -> ServiceResult<Marche> {
        self.perform(id, kind, changes).await.into()
    }

    async fn perform(
        &self,
        id: Id,
        kind: DateKind,
        changes: Vec<(Milestone, Option<NaiveDate>)>,
    ) -> EdcResult<Marche> {
        let contract = UpdateMarcheContract::new(self.user, None);
        contract.authorize()?;

        let mut marche = self.ctx.marches.get(id).await?;
        contract.check(&marche)?;

        let mut errors = ValidationErrors::new();
        for (milestone, date) in &changes {
            match marche.set_milestone_date(kind, *milestone, *date) {
                Ok(()) => {}
                Err(EdcError::Validation(found)) => errors.merge(found),
                Err(other) => return Err(other),
            }
        }
        errors.into_result()?;

        self.ctx.marches.save(&marche).await?;

        let action = match kind {
            DateKind::Planned => "set_planned_date",
            DateKind::Realized => "set_realized_date",
        };
        let detail = changes
            .iter()
            .map(|(m, d)| match d {
                Some(d) => format!("{} = {}", m.key(), d),
                None => format!("{} cleared", m.key()),
            })
            .collect::<Vec<_>>()
            .join(", ");
        self.ctx.audit.log(
            self.user,
            AuditModule::Milestones,
            action,
            format!("{}: {}", marche.numero_dossier, detail),
        );
        Ok(marche)
    }
}
