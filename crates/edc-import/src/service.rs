//! Import and export services

use chrono::{Duration, Utc};
use edc_contracts::marches::MarcheBaseContract;
use edc_contracts::{require_capability, Contract};
use edc_core::traits::{Id, UserContext};
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::{dossier_key, AuditModule, CreateMarcheDto, Project};
use edc_services::marches::live_marches;
use edc_services::{ServiceContext, ServiceResult};
use serde::Serialize;
use std::collections::HashSet;

use crate::error::ImportError;
use crate::reader::{parse_sheet, ImportRow, RowIssue};
use crate::writer::{write_marches, write_template};

/// What an import did
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub project_id: Option<Id>,
    pub imported: usize,
    pub marche_ids: Vec<Id>,
    /// Rows left out, with the reason
    pub skipped: Vec<RowIssue>,
    /// Cells that fell back to a default
    pub warnings: Vec<RowIssue>,
}

pub struct ImportService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> ImportService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, project_id: Id, bytes: &[u8]) -> ServiceResult<ImportReport> {
        self.perform(project_id, bytes).await.into()
    }

    async fn perform(&self, project_id: Id, bytes: &[u8]) -> EdcResult<ImportReport> {
        require_capability(self.user, Capability::Import, "import procurement plans")?;
        let project = self.ctx.projects.get(project_id).await?;

        let sheet = parse_sheet(bytes)?;
        if sheet.rows.is_empty() {
            return Err(ImportError::NoValidRows.into());
        }

        let mut taken: HashSet<String> = self
            .ctx
            .marches
            .all()
            .await?
            .iter()
            .map(|m| dossier_key(&m.numero_dossier))
            .collect();

        let mut report = ImportReport {
            project_id: Some(project_id),
            skipped: sheet.skipped,
            warnings: sheet.warnings,
            ..Default::default()
        };

        let contract = MarcheBaseContract::new(None);
        let base_time = Utc::now();
        for (index, row) in sheet.rows.into_iter().enumerate() {
            let line = row.line;
            let key = dossier_key(&row.numero_dossier);
            if taken.contains(&key) {
                tracing::warn!(line, numero = %row.numero_dossier, "duplicate dossier number skipped");
                report.skipped.push(RowIssue::new(
                    line,
                    format!("dossier number '{}' already exists", row.numero_dossier),
                ));
                continue;
            }

            let mut marche = to_dto(&project, row).into_marche(
                project.funding_source,
                Some(self.user.display_name().to_string()),
            );
            // Rows keep their sheet order when listed by creation time
            marche.created_at = base_time + Duration::milliseconds(index as i64);
            marche.updated_at = marche.created_at;

            if let Err(errors) = contract.validate(&marche) {
                report
                    .skipped
                    .push(RowIssue::new(line, errors.full_messages().join("; ")));
                continue;
            }

            self.ctx.marches.save(&marche).await?;
            taken.insert(key);
            report.marche_ids.push(marche.id);
        }
        report.imported = report.marche_ids.len();
        report.skipped.sort_by_key(|issue| issue.line);

        if report.marche_ids.is_empty() {
            for issue in &report.skipped {
                tracing::warn!(line = issue.line, reason = %issue.message, "import row rejected");
            }
            return Err(ImportError::NoValidRows.into());
        }

        tracing::info!(
            project_id = %project_id,
            imported = report.imported,
            skipped = report.skipped.len(),
            warnings = report.warnings.len(),
            "procurement plan imported"
        );
        self.ctx.audit.log(
            self.user,
            AuditModule::Import,
            "import",
            format!(
                "{}: {} marché(s) imported, {} row(s) skipped",
                project.name,
                report.imported,
                report.skipped.len()
            ),
        );
        Ok(report)
    }
}

fn to_dto(project: &Project, row: ImportRow) -> CreateMarcheDto {
    CreateMarcheDto {
        project_id: project.id,
        numero_dossier: row.numero_dossier,
        objet: row.objet,
        fonction: row.fonction,
        activite: row.activite,
        type_ao: row.type_ao,
        type_prestation: row.type_prestation,
        montant_prevu: row.montant_prevu,
        source_financement: row.source_financement,
        ligne_budgetaire: row.ligne_budgetaire,
        planned_dates: row.planned_dates,
    }
}

/// The empty sheet users fill in
pub fn export_template<U: UserContext>(user: &U) -> EdcResult<String> {
    require_capability(user, Capability::Download, "download exports")?;
    Ok(write_template()?)
}

pub struct ExportService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> ExportService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    /// Every live marché of the project, in list order
    pub async fn project(self, project_id: Id) -> EdcResult<String> {
        require_capability(self.user, Capability::Download, "download exports")?;
        let project = self.ctx.projects.get(project_id).await?;
        let marches = live_marches(self.ctx, Some(project_id)).await?;
        let sheet = write_marches(&marches)?;

        tracing::info!(project_id = %project_id, rows = marches.len(), "procurement plan exported");
        self.ctx.audit.log(
            self.user,
            AuditModule::Export,
            "export",
            format!("{}: {} marché(s)", project.name, marches.len()),
        );
        Ok(sheet)
    }
}
