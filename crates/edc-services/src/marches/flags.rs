//! Event flag service
//!
//! Flags drive the derived status and close later phases. Clearing a flag
//! also clears the realized date of its event milestone and its reason.

use edc_contracts::marches::UpdateMarcheContract;
use edc_contracts::Contract;
use edc_core::traits::{Id, UserContext};
use edc_core::EdcResult;
use edc_models::{AuditModule, Marche, Milestone};
use serde::Deserialize;

use crate::context::ServiceContext;
use crate::result::ServiceResult;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlagsUpdate {
    pub is_infructueux: Option<bool>,
    pub is_annule: Option<bool>,
    pub has_additif: Option<bool>,
    pub has_recours: Option<bool>,
    pub motif_infructueux: Option<String>,
    pub motif_annulation: Option<String>,
}

impl FlagsUpdate {
    pub fn apply_to(&self, marche: &mut Marche) -> Vec<String> {
        let mut changes = Vec::new();
        let flags = [
            (self.is_infructueux, Milestone::Infructueux),
            (self.is_annule, Milestone::Annulation),
            (self.has_additif, Milestone::Additif),
            (self.has_recours, Milestone::Recours),
        ];
        for (value, milestone) in flags {
            let Some(value) = value else { continue };
            let flag = match milestone {
                Milestone::Infructueux => &mut marche.flags.is_infructueux,
                Milestone::Annulation => &mut marche.flags.is_annule,
                Milestone::Additif => &mut marche.flags.has_additif,
                _ => &mut marche.flags.has_recours,
            };
            if *flag == value {
                continue;
            }
            *flag = value;
            changes.push(format!("{} {}", milestone.key(), if value { "set" } else { "cleared" }));
            if !value {
                marche.realized_dates.remove(&milestone);
                match milestone {
                    Milestone::Infructueux => marche.motif_infructueux = None,
                    Milestone::Annulation => marche.motif_annulation = None,
                    _ => {}
                }
            }
        }

        if let Some(motif) = &self.motif_infructueux {
            marche.set_motif(Milestone::Infructueux, motif);
        }
        if let Some(motif) = &self.motif_annulation {
            marche.set_motif(Milestone::Annulation, motif);
        }
        marche.touch();
        changes
    }
}

pub struct FlagsService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> FlagsService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, id: Id, update: FlagsUpdate) -> ServiceResult<Marche> {
        self.perform(id, update).await.into()
    }

    async fn perform(&self, id: Id, update: FlagsUpdate) -> EdcResult<Marche> {
        let contract = UpdateMarcheContract::new(self.user, None);
        contract.authorize()?;

        let mut marche = self.ctx.marches.get(id).await?;
        contract.check(&marche)?;
        let changes = update.apply_to(&mut marche);

        self.ctx.marches.save(&marche).await?;
        if !changes.is_empty() {
            tracing::info!(marche_id = %marche.id, status = marche.status().label, "flags changed");
            self.ctx.audit.log(
                self.user,
                AuditModule::Marches,
                "set_flags",
                format!("{}: {}", marche.numero_dossier, changes.join(", ")),
            );
        }
        Ok(marche)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::*;
    use chrono::NaiveDate;
    use edc_models::{MilestoneGroup, Role};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_cancel_marche() {
        let ctx = context();
        let m = Marche::new(Uuid::new_v4(), "M-1", "Objet");
        ctx.marches.save(&m).await.unwrap();

        let update = FlagsUpdate {
            is_annule: Some(true),
            motif_annulation: Some("Budget retiré".into()),
            ..Default::default()
        };
        let updated = FlagsService::new(&ctx, &actor(Role::Agent))
            .call(m.id, update)
            .await
            .into_result()
            .unwrap();
        assert_eq!(updated.status().label, "Cancelled");
        assert!(!updated.is_phase_accessible(MilestoneGroup::Contracting));
        assert_eq!(updated.motif_annulation.as_deref(), Some("Budget retiré"));
    }

    #[test]
    fn test_motif_needs_its_flag() {
        let mut m = Marche::new(Uuid::new_v4(), "M-2", "Objet");
        let update = FlagsUpdate { motif_annulation: Some("Sans suite".into()), ..Default::default() };
        update.apply_to(&mut m);
        assert_eq!(m.motif_annulation, None);

        let update = FlagsUpdate {
            is_annule: Some(true),
            motif_annulation: Some(" ".into()),
            ..Default::default()
        };
        update.apply_to(&mut m);
        assert!(m.flags.is_annule);
        assert_eq!(m.motif_annulation, None);
    }

    #[test]
    fn test_clearing_flag_drops_event_date() {
        let mut m = Marche::new(Uuid::new_v4(), "M-1", "Objet");
        m.flags.has_recours = true;
        m.realized_dates
            .insert(Milestone::Recours, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

        let changes = FlagsUpdate { has_recours: Some(false), ..Default::default() }.apply_to(&mut m);
        assert_eq!(changes, vec!["recours cleared"]);
        assert!(m.realized_dates.is_empty());
    }

    #[test]
    fn test_unchanged_flags_report_nothing() {
        let mut m = Marche::new(Uuid::new_v4(), "M-1", "Objet");
        let changes = FlagsUpdate { is_annule: Some(false), ..Default::default() }.apply_to(&mut m);
        assert!(changes.is_empty());
    }
}
