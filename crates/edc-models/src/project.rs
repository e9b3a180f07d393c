//! Project model
//!
//! Collection: projects
//!
//! A project groups the marchés of one funding envelope and fiscal year.

use chrono::{DateTime, Utc};
use edc_core::traits::{new_id, Entity, Id, Identifiable, Timestamped};
use edc_core::types::FundingSource;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::document::DocumentRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,

    pub name: String,

    pub fiscal_year: i32,

    #[serde(default)]
    pub funding_source: FundingSource,

    /// Lender name, required when funding is external
    pub lender: Option<String>,

    /// Signed procurement plan (PPM)
    pub signed_plan: Option<DocumentRef>,

    pub description: Option<String>,

    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for Project {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Project {
    const COLLECTION: &'static str = "projects";
    const TYPE_NAME: &'static str = "Project";
}

impl Project {
    pub fn new(name: impl Into<String>, fiscal_year: i32) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            fiscal_year,
            funding_source: FundingSource::InternalBudget,
            lender: None,
            signed_plan: None,
            description: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Strip the signed plan payload
    pub fn redact_documents(&mut self) {
        if let Some(plan) = self.signed_plan.as_mut() {
            plan.redact();
        }
    }

    pub fn externally_funded(&self) -> bool {
        self.funding_source == FundingSource::ExternalLender
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// DTO for creating a new project
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(range(min = 2000, max = 2100))]
    pub fiscal_year: i32,

    pub funding_source: Option<FundingSource>,

    #[validate(length(max = 255))]
    pub lender: Option<String>,

    pub description: Option<String>,
}

impl CreateProjectDto {
    pub fn into_project(self, created_by: Option<String>) -> Project {
        let mut project = Project::new(self.name.trim(), self.fiscal_year);
        project.funding_source = self.funding_source.unwrap_or_default();
        project.lender = self.lender.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
        project.description = self.description;
        project.created_by = created_by;
        project
    }
}

/// DTO for updating a project
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateProjectDto {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(range(min = 2000, max = 2100))]
    pub fiscal_year: Option<i32>,
    pub funding_source: Option<FundingSource>,
    pub lender: Option<String>,
    pub description: Option<String>,
}

impl UpdateProjectDto {
    /// Apply updates to a project
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(ref name) = self.name {
            project.name = name.trim().to_string();
        }
        if let Some(year) = self.fiscal_year {
            project.fiscal_year = year;
        }
        if let Some(source) = self.funding_source {
            project.funding_source = source;
        }
        if let Some(ref lender) = self.lender {
            let lender = lender.trim();
            project.lender = (!lender.is_empty()).then(|| lender.to_string());
        }
        if let Some(ref description) = self.description {
            project.description = Some(description.clone());
        }
        // An internal budget never keeps a lender around.
        if project.funding_source == FundingSource::InternalBudget {
            project.lender = None;
        }
        project.updated_at = Utc::now();
    }
}
