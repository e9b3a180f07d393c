//! Marché services
//!
//! Creation, descriptive edits, milestone dates, event flags, documents,
//! the execution record and the trash. Every edit of an existing marché
//! goes through the update contract.

mod create;
mod documents;
mod execution;
mod flags;
mod milestones;
mod trash;
mod update;

pub use create::CreateMarcheService;
pub use documents::DocumentService;
pub use execution::{ExecutionService, TerminationRequest};
pub use flags::{FlagsService, FlagsUpdate};
pub use milestones::MilestoneDateService;
pub use trash::{list_trash, TrashService};
pub use update::UpdateMarcheService;

use chrono::NaiveDate;
use edc_core::traits::{Id, SoftDeletable, UserContext};
use edc_core::EdcResult;
use edc_models::{
    status::lateness, Lateness, Marche, MarcheView, Milestone, MilestoneGroup, StatusReport,
};
use serde::{Deserialize, Serialize};

use crate::context::{can_read_payloads, require_login, ServiceContext};

/// List filters; all optional and combined with AND
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarcheFilter {
    pub project_id: Option<Id>,
    /// Case-insensitive match on dossier number or object
    pub search: Option<String>,
    /// Exact derived status label
    pub status: Option<String>,
    pub late: Option<bool>,
}

impl MarcheFilter {
    pub fn project(project_id: Id) -> Self {
        Self {
            project_id: Some(project_id),
            ..Default::default()
        }
    }

    fn matches(&self, marche: &Marche, today: NaiveDate) -> bool {
        if self.project_id.is_some_and(|p| p != marche.project_id) {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !marche.numero_dossier.to_lowercase().contains(&needle)
                && !marche.objet.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if !marche.status().label.eq_ignore_ascii_case(status.trim()) {
                return false;
            }
        }
        if let Some(late) = self.late {
            if marche.is_late(today) != late {
                return false;
            }
        }
        true
    }
}

/// Live marchés in creation order
pub async fn live_marches(ctx: &ServiceContext, project_id: Option<Id>) -> EdcResult<Vec<Marche>> {
    let mut marches = ctx
        .marches
        .filter(|m| !m.is_deleted() && project_id.map_or(true, |p| m.project_id == p))
        .await?;
    marches.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.numero_dossier.cmp(&b.numero_dossier))
    });
    Ok(marches)
}

pub async fn list_marches<U: UserContext>(
    ctx: &ServiceContext,
    user: &U,
    filter: &MarcheFilter,
) -> EdcResult<Vec<MarcheView>> {
    require_login(user)?;
    let today = ctx.today();
    let payloads = can_read_payloads(user);
    Ok(live_marches(ctx, filter.project_id)
        .await?
        .into_iter()
        .filter(|m| filter.matches(m, today))
        .map(|m| readable(m, payloads).view(today))
        .collect())
}

pub async fn get_marche<U: UserContext>(ctx: &ServiceContext, user: &U, id: Id) -> EdcResult<MarcheView> {
    require_login(user)?;
    let marche = ctx.marches.get(id).await?;
    Ok(readable(marche, can_read_payloads(user)).view(ctx.today()))
}

/// The marché as a reader sees it, without payloads unless allowed
pub(crate) fn readable(mut marche: Marche, payloads: bool) -> Marche {
    if !payloads {
        marche.redact_documents();
    }
    marche
}

pub async fn marche_status<U: UserContext>(ctx: &ServiceContext, user: &U, id: Id) -> EdcResult<StatusReport> {
    require_login(user)?;
    Ok(ctx.marches.get(id).await?.status())
}

/// One milestone as shown in a phase
#[derive(Debug, Clone, Serialize)]
pub struct MilestoneState {
    pub milestone: Milestone,
    pub label: &'static str,
    pub takes_planned_date: bool,
    pub applicable: bool,
    pub planned: Option<NaiveDate>,
    pub realized: Option<NaiveDate>,
    pub lateness: Lateness,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseState {
    pub group: MilestoneGroup,
    pub label: &'static str,
    pub accessible: bool,
    pub milestones: Vec<MilestoneState>,
}

/// Every phase of a marché with its gating and milestone dates
pub fn phase_states(marche: &Marche, today: NaiveDate) -> Vec<PhaseState> {
    MilestoneGroup::ALL
        .into_iter()
        .map(|group| PhaseState {
            group,
            label: group.label(),
            accessible: marche.is_phase_accessible(group),
            milestones: group
                .milestones()
                .map(|m| {
                    let planned = marche.planned_dates.get(&m).copied();
                    let realized = marche.realized_dates.get(&m).copied();
                    MilestoneState {
                        milestone: m,
                        label: m.label(),
                        takes_planned_date: m.is_planned(),
                        applicable: marche.milestone_applicable(m),
                        planned,
                        realized,
                        lateness: lateness(planned, realized, today),
                    }
                })
                .collect(),
        })
        .collect()
}

pub async fn marche_phases<U: UserContext>(
    ctx: &ServiceContext,
    user: &U,
    id: Id,
) -> EdcResult<Vec<PhaseState>> {
    require_login(user)?;
    let marche = ctx.marches.get(id).await?;
    Ok(phase_states(&marche, ctx.today()))
}
