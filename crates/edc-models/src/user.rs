//! User model
//!
//! Collection: users

use chrono::{DateTime, Utc};
use edc_core::traits::{new_id, Entity, Id, Identifiable, Timestamped};
use edc_core::types::UserStatus;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::role::Role;

/// User account
///
/// `password_hash` is persisted with the record but never leaves the API;
/// see the user representer in `edc-api`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Id,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Login, stored lower-cased
    #[validate(email)]
    pub email: String,

    pub role: Role,

    #[serde(default)]
    pub status: UserStatus,

    /// Argon2 PHC string
    #[serde(default)]
    pub password_hash: Option<String>,

    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for User {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for User {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const TYPE_NAME: &'static str = "User";
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            email: normalize_email(&email.into()),
            role,
            status: UserStatus::Active,
            password_hash: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn active(&self) -> bool {
        self.status.is_active()
    }

    /// Active and holding a credential
    pub fn can_login(&self) -> bool {
        self.active() && self.password_hash.is_some()
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// New user creation parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    pub role: Role,

    pub password: Option<String>,

    pub status: Option<UserStatus>,
}

impl From<NewUser> for User {
    fn from(new: NewUser) -> Self {
        let mut user = User::new(new.name, new.email, new.role);
        user.status = new.status.unwrap_or_default();
        user
    }
}

/// User update parameters
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub password: Option<String>,
}

impl UpdateUser {
    /// Apply everything except the password, which needs hashing first
    pub fn apply_to(&self, user: &mut User) {
        if let Some(ref name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(ref email) = self.email {
            user.email = normalize_email(email);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
        user.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new("Awa", "  Awa.Ndiaye@EDC.cm ", Role::Agent);
        assert_eq!(user.email, "awa.ndiaye@edc.cm");
        assert!(user.active());
        assert!(!user.can_login());
    }

    #[test]
    fn test_update_applies_fields() {
        let mut user = User::new("Awa", "awa@edc.cm", Role::Agent);
        let update = UpdateUser {
            role: Some(Role::Viewer),
            status: Some(UserStatus::Disabled),
            ..Default::default()
        };
        update.apply_to(&mut user);
        assert_eq!(user.role, Role::Viewer);
        assert!(!user.active());
        assert_eq!(user.name, "Awa");
    }

    #[test]
    fn test_invalid_email_fails_validation() {
        let new = NewUser {
            name: "X".into(),
            email: "not-an-email".into(),
            role: Role::Guest,
            password: None,
            status: None,
        };
        assert!(new.validate().is_err());
    }
}
