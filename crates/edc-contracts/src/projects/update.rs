//! Update contract for projects

use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::Project;

use super::base::ProjectBaseContract;
use crate::base::{require_capability, Contract, ValidationResult};

/// Contract for updating an existing project
pub struct UpdateProjectContract<'a, U: UserContext> {
    base: ProjectBaseContract,
    user: &'a U,
}

impl<'a, U: UserContext> UpdateProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self {
            base: ProjectBaseContract::new(),
            user,
        }
    }
}

impl<'a, U: UserContext> Contract<Project> for UpdateProjectContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::Write, "edit projects")
    }

    fn validate(&self, project: &Project) -> ValidationResult {
        self.base.validate(project)
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(
            attribute,
            "name" | "fiscal_year" | "funding_source" | "lender" | "description" | "signed_plan"
        )
    }
}
