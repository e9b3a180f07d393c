//! Create contract for users

use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::Role;

use super::base::{UserBaseContract, UserForm};
use crate::base::{require_capability, Contract, ValidationResult};

/// Contract for creating a new user
pub struct CreateUserContract<'a, U: UserContext> {
    base: UserBaseContract,
    user: &'a U,
}

impl<'a, U: UserContext> CreateUserContract<'a, U> {
    pub fn new(user: &'a U, password_min_length: usize) -> Self {
        Self {
            base: UserBaseContract::new(password_min_length),
            user,
        }
    }
}

impl<'a, 'f, U: UserContext> Contract<UserForm<'f>> for CreateUserContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::ManageUsers, "manage users")
    }

    fn validate(&self, form: &UserForm<'f>) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if form.user.role == Role::SuperAdmin && !self.user.allowed(Capability::ConfigureSystem) {
            errors.add("role", "can only be granted by a super administrator");
        }
        if form.password.is_none() {
            errors.add("password", "can't be blank");
        }
        if let Err(base_errors) = self.base.validate(form) {
            errors.merge(base_errors);
        }

        errors.into_result()
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(attribute, "name" | "email" | "role" | "status" | "password")
    }
}
