//! Delete contract for projects
//!
//! Whether the project still owns live marchés is checked by the service.

use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::Project;

use crate::base::{require_capability, Contract, ValidationResult};

pub struct DeleteProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> DeleteProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for DeleteProjectContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::Write, "delete projects")
    }

    fn validate(&self, _project: &Project) -> ValidationResult {
        Ok(())
    }

    fn is_writable(&self, _attribute: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::MockUser;

    #[test]
    fn test_delete_needs_write() {
        let project = Project::new("P", 2025);
        let agent = MockUser::with(&[Capability::Write]);
        assert!(DeleteProjectContract::new(&agent).check(&project).is_ok());

        let viewer = MockUser::with(&[Capability::Download]);
        assert!(DeleteProjectContract::new(&viewer).check(&project).is_err());
    }
}
