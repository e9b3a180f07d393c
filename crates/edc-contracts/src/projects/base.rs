//! Base contract for projects

use edc_core::error::ValidationErrors;
use edc_core::types::FundingSource;
use edc_models::Project;

use crate::base::{validate_present, Contract, ValidationResult};

pub const MIN_FISCAL_YEAR: i32 = 2000;
pub const MAX_FISCAL_YEAR: i32 = 2100;

/// Field rules shared by create and update
#[derive(Default)]
pub struct ProjectBaseContract;

impl ProjectBaseContract {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_fiscal_year(&self, year: i32, errors: &mut ValidationErrors) {
        if !(MIN_FISCAL_YEAR..=MAX_FISCAL_YEAR).contains(&year) {
            errors.add(
                "fiscal_year",
                format!("must be between {} and {}", MIN_FISCAL_YEAR, MAX_FISCAL_YEAR),
            );
        }
    }

    /// External funding needs a named lender
    pub fn validate_lender(&self, project: &Project, errors: &mut ValidationErrors) {
        if project.funding_source == FundingSource::ExternalLender {
            match project.lender.as_deref().map(str::trim) {
                Some(lender) if !lender.is_empty() => {
                    validate_present("lender", lender, 255, errors)
                }
                _ => errors.add("lender", "can't be blank when funding is external"),
            }
        }
    }
}

impl Contract<Project> for ProjectBaseContract {
    fn validate(&self, project: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_present("name", &project.name, 255, &mut errors);
        self.validate_fiscal_year(project.fiscal_year, &mut errors);
        self.validate_lender(project, &mut errors);

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_project() {
        let project = Project::new("PPM 2025", 2025);
        assert!(ProjectBaseContract::new().validate(&project).is_ok());
    }

    #[test]
    fn test_blank_name_and_bad_year() {
        let project = Project::new("  ", 1980);
        let errors = ProjectBaseContract::new().validate(&project).unwrap_err();
        assert!(errors.has_error("name"));
        assert!(errors.has_error("fiscal_year"));
    }

    #[test]
    fn test_external_funding_requires_lender() {
        let mut project = Project::new("BAD 2025", 2025);
        project.funding_source = FundingSource::ExternalLender;
        let errors = ProjectBaseContract::new().validate(&project).unwrap_err();
        assert!(errors.has_error("lender"));

        project.lender = Some("Banque Africaine de Développement".into());
        assert!(ProjectBaseContract::new().validate(&project).is_ok());
    }
}
