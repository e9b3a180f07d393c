//! Create contract for projects

use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::Project;

use super::base::ProjectBaseContract;
use crate::base::{require_capability, Contract, ValidationResult};

/// Contract for creating a new project
pub struct CreateProjectContract<'a, U: UserContext> {
    base: ProjectBaseContract,
    user: &'a U,
}

impl<'a, U: UserContext> CreateProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self {
            base: ProjectBaseContract::new(),
            user,
        }
    }
}

impl<'a, U: UserContext> Contract<Project> for CreateProjectContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::Write, "create projects")
    }

    fn validate(&self, project: &Project) -> ValidationResult {
        self.base.validate(project)
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(
            attribute,
            "name" | "fiscal_year" | "funding_source" | "lender" | "description"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::MockUser;

    #[test]
    fn test_writer_can_create() {
        let user = MockUser::with(&[Capability::Write]);
        let contract = CreateProjectContract::new(&user);
        assert!(contract.check(&Project::new("PPM 2025", 2025)).is_ok());
    }

    #[test]
    fn test_viewer_cannot_create() {
        let user = MockUser::with(&[Capability::Download]);
        let contract = CreateProjectContract::new(&user);
        let err = contract.check(&Project::new("PPM 2025", 2025)).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_permission_checked_before_fields() {
        let user = MockUser::with(&[]);
        let contract = CreateProjectContract::new(&user);
        let err = contract.check(&Project::new("", 1)).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_writable_attributes() {
        let user = MockUser::all();
        let contract = CreateProjectContract::new(&user);
        assert!(contract.is_writable("lender"));
        assert!(!contract.is_writable("created_at"));
    }
}
