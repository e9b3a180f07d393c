//! Permission predicate
//!
//! One flat table maps each role to its capabilities. There are no
//! per-resource grants and no overrides.

use edc_core::traits::{Id, UserContext};
use edc_core::types::{Capability, UserStatus};
use edc_models::{Role, User};
use uuid::Uuid;

/// Static role → capability table
pub fn role_allows(role: Role, capability: Capability) -> bool {
    use Capability::*;
    match role {
        Role::SuperAdmin => true,
        Role::Admin => matches!(capability, Write | Download | Import | ManageUsers),
        Role::Agent => matches!(capability, Write | Download | Import),
        Role::Viewer => matches!(capability, Download),
        Role::Guest => false,
    }
}

// ============================================================================
// User Context
// ============================================================================

/// Authenticated principal
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    is_anonymous: bool,
}

impl CurrentUser {
    pub fn new(id: Id, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            status: UserStatus::Active,
            is_anonymous: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            id: Uuid::nil(),
            name: "anonymous".to_string(),
            email: String::new(),
            role: Role::Guest,
            status: UserStatus::Active,
            is_anonymous: true,
        }
    }

    /// Internal actor used for bootstrap and maintenance tasks
    pub fn system() -> Self {
        Self::new(Uuid::nil(), "system", "", Role::SuperAdmin)
    }

    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.allowed(*c))
            .collect()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            is_anonymous: false,
        }
    }
}

impl UserContext for CurrentUser {
    fn user_id(&self) -> Id {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn role_label(&self) -> &str {
        self.role.as_str()
    }

    fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }

    fn allowed(&self, capability: Capability) -> bool {
        !self.is_anonymous && self.status.is_active() && role_allows(self.role, capability)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser::new(Uuid::new_v4(), "Test", "test@edc.cm", role)
    }

    #[test]
    fn test_guest_has_nothing() {
        for cap in Capability::ALL {
            assert!(!user(Role::Guest).allowed(cap));
        }
    }

    #[test]
    fn test_super_admin_has_everything() {
        for cap in Capability::ALL {
            assert!(user(Role::SuperAdmin).allowed(cap));
        }
    }

    #[test]
    fn test_table_rows() {
        let admin = user(Role::Admin);
        assert!(admin.allowed(Capability::ManageUsers));
        assert!(!admin.allowed(Capability::ConfigureSystem));

        let agent = user(Role::Agent);
        assert!(agent.allowed(Capability::Import));
        assert!(!agent.allowed(Capability::ManageUsers));

        assert_eq!(user(Role::Viewer).capabilities(), vec![Capability::Download]);
    }

    #[test]
    fn test_disabled_user_is_denied() {
        let mut admin = user(Role::SuperAdmin);
        admin.status = UserStatus::Disabled;
        assert!(admin.capabilities().is_empty());
    }

    #[test]
    fn test_anonymous_user() {
        let anon = CurrentUser::anonymous();
        assert!(anon.is_anonymous());
        assert!(!anon.is_logged_in());
        assert!(anon.capabilities().is_empty());
    }
}
