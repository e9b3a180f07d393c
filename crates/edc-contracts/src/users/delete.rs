//! Delete contract for users

use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::{Role, User};

use crate::base::{require_capability, Contract, ValidationResult};

pub struct DeleteUserContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> DeleteUserContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<User> for DeleteUserContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::ManageUsers, "manage users")
    }

    fn validate(&self, target: &User) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if target.id == self.user.user_id() {
            errors.add_base("You cannot delete your own account");
        }
        if target.role == Role::SuperAdmin && !self.user.allowed(Capability::ConfigureSystem) {
            errors.add_base("Super administrator accounts can only be deleted by a super administrator");
        }
        errors.into_result()
    }

    fn is_writable(&self, _attribute: &str) -> bool {
        false
    }
}
