//! Marché (procurement file) model
//!
//! Collection: marches
//!
//! The central record. Belongs to one project, carries planned and realized
//! dates per milestone, supporting documents, event flags and the execution
//! record.

use chrono::{DateTime, NaiveDate, Utc};
use edc_core::traits::{new_id, Entity, Id, Identifiable, ProjectScoped, SoftDeletable, Timestamped};
use edc_core::types::FundingSource;
use edc_core::{EdcError, EdcResult, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::document::DocumentRef;
use crate::execution::Execution;
use crate::milestone::{Milestone, MilestoneGroup};
use crate::phase::{accessible_groups, is_phase_accessible};
use crate::status::{derive_status, lateness, Lateness, StatusReport};

/// Event flags driving status and phase gating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarcheFlags {
    /// Declared unsuccessful (infructueux)
    #[serde(default)]
    pub is_infructueux: bool,
    /// Procedure cancelled (annulé)
    #[serde(default)]
    pub is_annule: bool,
    /// An addendum was issued during consultation
    #[serde(default)]
    pub has_additif: bool,
    /// An appeal was filed against the award
    #[serde(default)]
    pub has_recours: bool,
}

/// Which of the two date maps a milestone date goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateKind {
    Planned,
    Realized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marche {
    pub id: Id,
    pub project_id: Id,

    /// Dossier number, unique among marchés that have not been purged
    pub numero_dossier: String,
    pub objet: String,

    /// Analytic function
    #[serde(default)]
    pub fonction: String,
    #[serde(default)]
    pub activite: String,
    #[serde(default)]
    pub type_ao: String,
    #[serde(default)]
    pub type_prestation: String,

    #[serde(default)]
    pub montant_prevu: f64,
    #[serde(default)]
    pub source_financement: FundingSource,
    #[serde(default)]
    pub ligne_budgetaire: String,

    #[serde(default)]
    pub planned_dates: BTreeMap<Milestone, NaiveDate>,
    #[serde(default)]
    pub realized_dates: BTreeMap<Milestone, NaiveDate>,

    /// Supporting documents keyed by slot (usually a milestone key)
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentRef>,

    #[serde(flatten)]
    pub flags: MarcheFlags,

    pub motif_infructueux: Option<String>,
    pub motif_annulation: Option<String>,

    #[serde(default)]
    pub execution: Execution,

    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,

    pub created_by: Option<String>,
    /// Drives list ordering
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for Marche {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Marche {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl SoftDeletable for Marche {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl ProjectScoped for Marche {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Entity for Marche {
    const COLLECTION: &'static str = "marches";
    const TYPE_NAME: &'static str = "Marche";
}

/// Comparison key for dossier numbers: trimmed, Unicode lower case
pub fn dossier_key(numero: &str) -> String {
    numero.trim().to_lowercase()
}

impl Marche {
    pub fn new(project_id: Id, numero_dossier: impl Into<String>, objet: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            project_id,
            numero_dossier: numero_dossier.into(),
            objet: objet.into(),
            fonction: String::new(),
            activite: String::new(),
            type_ao: String::new(),
            type_prestation: String::new(),
            montant_prevu: 0.0,
            source_financement: FundingSource::InternalBudget,
            ligne_budgetaire: String::new(),
            planned_dates: BTreeMap::new(),
            realized_dates: BTreeMap::new(),
            documents: BTreeMap::new(),
            flags: MarcheFlags::default(),
            motif_infructueux: None,
            motif_annulation: None,
            execution: Execution::default(),
            deleted_at: None,
            deleted_by: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> StatusReport {
        derive_status(&self.flags, &self.realized_dates)
    }

    pub fn is_phase_accessible(&self, group: MilestoneGroup) -> bool {
        is_phase_accessible(group, &self.flags)
    }

    /// Event milestones only apply once their flag is set
    pub fn milestone_applicable(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::Additif => self.flags.has_additif,
            Milestone::Recours => self.flags.has_recours,
            Milestone::Infructueux => self.flags.is_infructueux,
            Milestone::Annulation => self.flags.is_annule,
            _ => true,
        }
    }

    /// Record or clear a milestone date
    pub fn set_milestone_date(
        &mut self,
        kind: DateKind,
        milestone: Milestone,
        date: Option<NaiveDate>,
    ) -> EdcResult<()> {
        let mut errors = ValidationErrors::new();
        if !self.is_phase_accessible(milestone.group()) {
            errors.add(
                milestone.key(),
                format!("belongs to the closed {} phase", milestone.group().label()),
            );
        }
        if kind == DateKind::Planned && !milestone.is_planned() {
            errors.add(milestone.key(), "does not take a planned date");
        }
        if date.is_some() && !self.milestone_applicable(milestone) {
            errors.add(milestone.key(), "does not apply to this marché");
        }
        errors.into_result()?;

        let dates = match kind {
            DateKind::Planned => &mut self.planned_dates,
            DateKind::Realized => &mut self.realized_dates,
        };
        match date {
            Some(date) => dates.insert(milestone, date),
            None => dates.remove(&milestone),
        };
        self.touch();
        Ok(())
    }

    /// Per planned milestone lateness relative to `today`
    pub fn lateness_report(&self, today: NaiveDate) -> Vec<(Milestone, Lateness)> {
        Milestone::planned()
            .map(|m| {
                let state = lateness(
                    self.planned_dates.get(&m).copied(),
                    self.realized_dates.get(&m).copied(),
                    today,
                );
                (m, state)
            })
            .collect()
    }

    /// Late when any milestone is overdue
    pub fn is_late(&self, today: NaiveDate) -> bool {
        self.lateness_report(today)
            .iter()
            .any(|(_, l)| *l == Lateness::Late)
    }

    pub fn set_document(&mut self, slot: &str, document: DocumentRef) -> EdcResult<()> {
        let slot = slot.trim();
        if slot.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("slot", "can't be blank");
            return Err(errors.into());
        }
        self.documents.insert(slot.to_string(), document);
        self.touch();
        Ok(())
    }

    pub fn remove_document(&mut self, slot: &str) -> EdcResult<DocumentRef> {
        let removed = self
            .documents
            .remove(slot)
            .ok_or_else(|| EdcError::not_found("Document", "slot", slot))?;
        self.touch();
        Ok(removed)
    }

    pub fn soft_delete(&mut self, by: impl Into<String>) {
        self.deleted_at = Some(Utc::now());
        self.deleted_by = Some(by.into());
    }

    pub fn restore(&mut self) {
        self.deleted_at = None;
        self.deleted_by = None;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Reason for an unsuccessful or cancelled procedure. Blank text clears
    /// it, and none is kept while the matching flag is unset.
    pub fn set_motif(&mut self, milestone: Milestone, motif: &str) {
        let motif = Some(motif.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        match milestone {
            Milestone::Infructueux => {
                let flagged = self.flags.is_infructueux;
                self.motif_infructueux = motif.filter(|_| flagged);
            }
            Milestone::Annulation => {
                let flagged = self.flags.is_annule;
                self.motif_annulation = motif.filter(|_| flagged);
            }
            _ => {}
        }
    }

    /// Strip every document payload: slot documents and delivery documents
    pub fn redact_documents(&mut self) {
        self.documents.values_mut().for_each(DocumentRef::redact);
        self.execution
            .delivery_documents
            .iter_mut()
            .for_each(DocumentRef::redact);
    }

    pub fn view(self, today: NaiveDate) -> MarcheView {
        MarcheView {
            status: self.status(),
            is_late: self.is_late(today),
            accessible_groups: accessible_groups(&self.flags),
            marche: self,
        }
    }
}

/// A marché with its derived fields, as returned to readers
#[derive(Debug, Clone, Serialize)]
pub struct MarcheView {
    #[serde(flatten)]
    pub marche: Marche,
    pub status: StatusReport,
    pub is_late: bool,
    pub accessible_groups: Vec<MilestoneGroup>,
}

/// DTO for creating a marché
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMarcheDto {
    pub project_id: Id,

    #[validate(length(min = 1, max = 100))]
    pub numero_dossier: String,

    #[validate(length(min = 1))]
    pub objet: String,

    #[serde(default)]
    pub fonction: String,
    #[serde(default)]
    pub activite: String,
    #[serde(default)]
    pub type_ao: String,
    #[serde(default)]
    pub type_prestation: String,

    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub montant_prevu: f64,

    /// Defaults to the project's funding source
    pub source_financement: Option<FundingSource>,

    #[serde(default)]
    pub ligne_budgetaire: String,

    #[serde(default)]
    pub planned_dates: BTreeMap<Milestone, NaiveDate>,
}

impl CreateMarcheDto {
    pub fn into_marche(self, project_funding: FundingSource, created_by: Option<String>) -> Marche {
        let mut marche = Marche::new(
            self.project_id,
            self.numero_dossier.trim(),
            self.objet.trim(),
        );
        marche.fonction = self.fonction.trim().to_string();
        marche.activite = self.activite.trim().to_string();
        marche.type_ao = self.type_ao.trim().to_string();
        marche.type_prestation = self.type_prestation.trim().to_string();
        marche.montant_prevu = self.montant_prevu;
        marche.source_financement = self.source_financement.unwrap_or(project_funding);
        marche.ligne_budgetaire = self.ligne_budgetaire.trim().to_string();
        marche.planned_dates = self
            .planned_dates
            .into_iter()
            .filter(|(m, _)| m.is_planned())
            .collect();
        marche.created_by = created_by;
        marche
    }
}

/// DTO for updating the descriptive fields of a marché
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateMarcheDto {
    #[validate(length(min = 1, max = 100))]
    pub numero_dossier: Option<String>,
    #[validate(length(min = 1))]
    pub objet: Option<String>,
    pub fonction: Option<String>,
    pub activite: Option<String>,
    pub type_ao: Option<String>,
    pub type_prestation: Option<String>,
    #[validate(range(min = 0.0))]
    pub montant_prevu: Option<f64>,
    pub source_financement: Option<FundingSource>,
    pub ligne_budgetaire: Option<String>,
    pub motif_infructueux: Option<String>,
    pub motif_annulation: Option<String>,
}

impl UpdateMarcheDto {
    pub fn apply_to(&self, marche: &mut Marche) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *target = v.trim().to_string();
            }
        }
        set(&mut marche.numero_dossier, &self.numero_dossier);
        set(&mut marche.objet, &self.objet);
        set(&mut marche.fonction, &self.fonction);
        set(&mut marche.activite, &self.activite);
        set(&mut marche.type_ao, &self.type_ao);
        set(&mut marche.type_prestation, &self.type_prestation);
        set(&mut marche.ligne_budgetaire, &self.ligne_budgetaire);
        if let Some(amount) = self.montant_prevu {
            marche.montant_prevu = amount;
        }
        if let Some(source) = self.source_financement {
            marche.source_financement = source;
        }
        if let Some(motif) = &self.motif_infructueux {
            marche.set_motif(Milestone::Infructueux, motif);
        }
        if let Some(motif) = &self.motif_annulation {
            marche.set_motif(Milestone::Annulation, motif);
        }
        marche.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn marche() -> Marche {
        Marche::new(new_id(), "DAO-001/2024", "Fourniture de compteurs")
    }

    #[test]
    fn test_new_marche_is_registered_in_plan() {
        let m = marche();
        assert_eq!(m.status().label, "Registered in plan");
        assert!(!m.is_deleted());
    }

    #[test]
    fn test_realized_date_moves_status() {
        let mut m = marche();
        m.set_milestone_date(DateKind::Realized, Milestone::LancementAo, Some(d(2, 1)))
            .unwrap();
        assert_eq!(m.status().label, "Call for tenders launched");
        m.set_milestone_date(DateKind::Realized, Milestone::LancementAo, None)
            .unwrap();
        assert!(m.realized_dates.is_empty());
    }

    #[test]
    fn test_closed_phase_refuses_dates() {
        let mut m = marche();
        m.flags.is_infructueux = true;
        let err = m
            .set_milestone_date(DateKind::Realized, Milestone::SignatureContrat, Some(d(3, 1)))
            .unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert!(m
            .set_milestone_date(DateKind::Realized, Milestone::Infructueux, Some(d(3, 1)))
            .is_ok());
    }

    #[test]
    fn test_event_milestone_needs_its_flag() {
        let mut m = marche();
        assert!(m
            .set_milestone_date(DateKind::Realized, Milestone::Additif, Some(d(2, 5)))
            .is_err());
        assert!(m
            .set_milestone_date(DateKind::Planned, Milestone::Additif, Some(d(2, 5)))
            .is_err());
        m.flags.has_additif = true;
        assert!(m
            .set_milestone_date(DateKind::Realized, Milestone::Additif, Some(d(2, 5)))
            .is_ok());
    }

    #[test]
    fn test_is_late() {
        let mut m = marche();
        m.planned_dates.insert(Milestone::ElaborationDao, d(1, 10));
        assert!(m.is_late(d(1, 11)));
        assert!(!m.is_late(d(1, 10)));
        m.realized_dates.insert(Milestone::ElaborationDao, d(1, 12));
        assert!(!m.is_late(d(2, 1)));
    }

    #[test]
    fn test_flags_flatten_into_record() {
        let mut m = marche();
        m.flags.is_annule = true;
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["is_annule"], true);
        assert_eq!(json["has_recours"], false);
        let back: Marche = serde_json::from_value(json).unwrap();
        assert!(back.flags.is_annule);
    }

    #[test]
    fn test_view_carries_derived_fields() {
        let mut m = marche();
        m.flags.is_annule = true;
        let view = m.view(d(1, 1));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"]["label"], "Cancelled");
        assert_eq!(json["status"]["category"], "warning");
        assert_eq!(json["accessible_groups"].as_array().unwrap().len(), 3);
        assert_eq!(json["numero_dossier"], "DAO-001/2024");
    }

    #[test]
    fn test_create_dto_defaults_funding_to_project() {
        let dto = CreateMarcheDto {
            project_id: new_id(),
            numero_dossier: " 12/AONO/2024 ".into(),
            objet: "Travaux".into(),
            fonction: String::new(),
            activite: String::new(),
            type_ao: String::new(),
            type_prestation: String::new(),
            montant_prevu: 10.0,
            source_financement: None,
            ligne_budgetaire: String::new(),
            planned_dates: BTreeMap::from([
                (Milestone::LancementAo, d(3, 1)),
                (Milestone::Recours, d(4, 1)),
            ]),
        };
        let m = dto.into_marche(FundingSource::ExternalLender, None);
        assert_eq!(m.numero_dossier, "12/AONO/2024");
        assert_eq!(m.source_financement, FundingSource::ExternalLender);
        assert_eq!(m.planned_dates.len(), 1);
    }

    #[test]
    fn test_update_dto_normalizes_motifs() {
        let mut m = marche();
        let dto = UpdateMarcheDto {
            motif_infructueux: Some("  Offres hors budget ".into()),
            motif_annulation: Some("Budget retiré".into()),
            ..Default::default()
        };
        dto.apply_to(&mut m);
        assert_eq!(m.motif_infructueux, None);
        assert_eq!(m.motif_annulation, None);

        m.flags.is_infructueux = true;
        dto.apply_to(&mut m);
        assert_eq!(m.motif_infructueux.as_deref(), Some("Offres hors budget"));

        let blank = UpdateMarcheDto { motif_infructueux: Some("   ".into()), ..Default::default() };
        blank.apply_to(&mut m);
        assert_eq!(m.motif_infructueux, None);
    }

    #[test]
    fn test_dossier_key_folds_accented_letters() {
        assert_eq!(dossier_key(" É-1 "), dossier_key("é-1"));
        assert_ne!(dossier_key("E-1"), dossier_key("É-1"));
    }

    #[test]
    fn test_redact_documents_covers_slots_and_deliveries() {
        let mut m = marche();
        m.set_document("lancement_ao", DocumentRef::from_bytes("avis.pdf", None, b"x", "Agent"))
            .unwrap();
        m.execution
            .delivery_documents
            .push(DocumentRef::from_bytes("pv.pdf", None, b"y", "Agent"));

        m.redact_documents();
        assert!(m.documents["lancement_ao"].is_redacted());
        assert!(m.execution.delivery_documents[0].is_redacted());
        assert_eq!(m.documents["lancement_ao"].file_name, "avis.pdf");
    }

    #[test]
    fn test_documents() {
        let mut m = marche();
        let doc = DocumentRef::from_bytes("dao.pdf", None, b"x", "Agent");
        m.set_document("elaboration_dao", doc).unwrap();
        assert!(m.set_document("  ", DocumentRef::from_bytes("a", None, b"", "A")).is_err());
        assert!(m.remove_document("elaboration_dao").is_ok());
        assert!(m.remove_document("elaboration_dao").is_err());
    }
}
