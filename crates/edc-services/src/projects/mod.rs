//! Project services

mod create;
mod delete;
mod update;

pub use create::CreateProjectService;
pub use delete::DeleteProjectService;
pub use update::{SignedPlanService, UpdateProjectService};

use edc_core::traits::{Id, SoftDeletable, UserContext};
use edc_core::EdcResult;
use edc_models::Project;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::context::{can_read_payloads, require_login, ServiceContext};

/// Projects, newest fiscal year first, then by name
pub async fn list_projects<U: UserContext>(ctx: &ServiceContext, user: &U) -> EdcResult<Vec<Project>> {
    require_login(user)?;
    let mut projects = ctx.projects.all().await?;
    projects.sort_by(|a, b| {
        b.fiscal_year
            .cmp(&a.fiscal_year)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    if !can_read_payloads(user) {
        projects.iter_mut().for_each(Project::redact_documents);
    }
    Ok(projects)
}

pub async fn get_project<U: UserContext>(ctx: &ServiceContext, user: &U, id: Id) -> EdcResult<Project> {
    require_login(user)?;
    let mut project = ctx.projects.get(id).await?;
    if !can_read_payloads(user) {
        project.redact_documents();
    }
    Ok(project)
}

/// Dashboard figures for one project's live marchés
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub project_id: Id,
    pub marches: usize,
    pub late: usize,
    pub total_montant_prevu: f64,
    pub trashed: usize,
    /// Count per derived status label
    pub by_status: BTreeMap<&'static str, usize>,
}

pub async fn summarize_project<U: UserContext>(
    ctx: &ServiceContext,
    user: &U,
    id: Id,
) -> EdcResult<ProjectSummary> {
    require_login(user)?;
    let project = ctx.projects.get(id).await?;
    let today = ctx.today();

    let owned = ctx.marches.filter(|m| m.project_id == project.id).await?;
    let mut summary = ProjectSummary {
        project_id: project.id,
        marches: 0,
        late: 0,
        total_montant_prevu: 0.0,
        trashed: 0,
        by_status: BTreeMap::new(),
    };
    for marche in &owned {
        if marche.is_deleted() {
            summary.trashed += 1;
            continue;
        }
        summary.marches += 1;
        summary.total_montant_prevu += marche.montant_prevu;
        if marche.is_late(today) {
            summary.late += 1;
        }
        *summary.by_status.entry(marche.status().label).or_default() += 1;
    }
    Ok(summary)
}
