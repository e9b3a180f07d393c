//! Update contract for users

use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::types::{Capability, UserStatus};
use edc_core::EdcResult;
use edc_models::{Role, User};

use super::base::{UserBaseContract, UserForm};
use crate::base::{require_capability, Contract, ValidationResult};

/// Contract for updating a user
///
/// Needs the stored record to tell what changed.
pub struct UpdateUserContract<'a, U: UserContext> {
    base: UserBaseContract,
    user: &'a U,
    before: &'a User,
}

impl<'a, U: UserContext> UpdateUserContract<'a, U> {
    pub fn new(user: &'a U, before: &'a User, password_min_length: usize) -> Self {
        Self {
            base: UserBaseContract::new(password_min_length),
            user,
            before,
        }
    }

    fn touches_super_admin(&self, after: &User) -> bool {
        self.before.role == Role::SuperAdmin || after.role == Role::SuperAdmin
    }
}

impl<'a, 'f, U: UserContext> Contract<UserForm<'f>> for UpdateUserContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::ManageUsers, "manage users")
    }

    fn validate(&self, form: &UserForm<'f>) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        let after = form.user;

        if self.touches_super_admin(after) && !self.user.allowed(Capability::ConfigureSystem) {
            errors.add("role", "super administrator accounts can only be changed by a super administrator");
        }
        if after.id == self.user.user_id() {
            if after.status == UserStatus::Disabled {
                errors.add("status", "you cannot disable your own account");
            }
            if after.role.rank() < self.before.role.rank() {
                errors.add("role", "you cannot lower your own role");
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::MockUser;

    #[test]
    fn test_admin_changes_agent_role() {
        let admin = MockUser::with(&[Capability::ManageUsers]);
        let before = User::new("Agent", "agent@edc.cm", Role::Agent);
        let mut after = before.clone();
        after.role = Role::Viewer;
        let form = UserForm { user: &after, password: None };
        assert!(UpdateUserContract::new(&admin, &before, 8).check(&form).is_ok());
    }

    #[test]
    fn test_admin_cannot_touch_super_admin() {
        let admin = MockUser::with(&[Capability::ManageUsers]);
        let before = User::new("Root", "root@edc.cm", Role::SuperAdmin);
        let mut after = before.clone();
        after.status = UserStatus::Disabled;
        let form = UserForm { user: &after, password: None };
        assert!(UpdateUserContract::new(&admin, &before, 8).check(&form).is_err());
    }

    #[test]
    fn test_cannot_disable_self() {
        let me = MockUser::all();
        let mut before = User::new("Me", "me@edc.cm", Role::SuperAdmin);
        before.id = me.id;
        let mut after = before.clone();
        after.status = UserStatus::Disabled;
        let form = UserForm { user: &after, password: None };
        let errors = UpdateUserContract::new(&me, &before, 8).validate(&form).unwrap_err();
        assert!(errors.has_error("status"));
    }
}
