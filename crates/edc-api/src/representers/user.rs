//! User representer
//!
//! Stored users carry their password hash; it never leaves the API.

use chrono::{DateTime, Utc};
use edc_auth::CurrentUser;
use edc_core::traits::Id;
use edc_core::types::{Capability, UserStatus};
use edc_models::{Role, User};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UserRepresentation {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub role_label: &'static str,
    pub status: UserStatus,
    pub capabilities: Vec<Capability>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserRepresentation {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            role_label: user.role.label(),
            status: user.status,
            capabilities: CurrentUser::from(user).capabilities(),
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserRepresentation {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}
