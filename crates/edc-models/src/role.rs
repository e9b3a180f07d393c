//! Role model
//!
//! Every user holds exactly one role. What a role may do is decided by the
//! static capability table in `edc-auth`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Agent,
    Viewer,
    #[default]
    Guest,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Self::SuperAdmin,
        Self::Admin,
        Self::Agent,
        Self::Viewer,
        Self::Guest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Agent => "AGENT",
            Self::Viewer => "VIEWER",
            Self::Guest => "GUEST",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super administrateur",
            Self::Admin => "Administrateur",
            Self::Agent => "Agent",
            Self::Viewer => "Lecteur",
            Self::Guest => "Invité",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Higher is more privileged
    pub fn rank(&self) -> u8 {
        match self {
            Self::SuperAdmin => 4,
            Self::Admin => 3,
            Self::Agent => 2,
            Self::Viewer => 1,
            Self::Guest => 0,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(Role::parse("super_admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("Super Admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"SUPER_ADMIN\""
        );
    }

    #[test]
    fn test_rank_order() {
        assert!(Role::SuperAdmin.rank() > Role::Admin.rank());
        assert!(Role::Viewer.rank() > Role::Guest.rank());
    }
}
