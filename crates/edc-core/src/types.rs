//! Common types used throughout Marchés360

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capabilities gated by the permission table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Write,
    Download,
    Import,
    ManageUsers,
    ConfigureSystem,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Write,
        Capability::Download,
        Capability::Import,
        Capability::ManageUsers,
        Capability::ConfigureSystem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Download => "download",
            Self::Import => "import",
            Self::ManageUsers => "manage_users",
            Self::ConfigureSystem => "configure_system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Disabled,
}

impl UserStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Display category of a derived marché status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Success,
    Warning,
    Neutral,
}

/// Where the money for a project or marché comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FundingSource {
    #[default]
    InternalBudget,
    ExternalLender,
}

impl FundingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InternalBudget => "internal_budget",
            Self::ExternalLender => "external_lender",
        }
    }

    /// Lenient parse used by the spreadsheet import
    ///
    /// Accepts the canonical names and the usual short forms found in plans
    /// (`BIP`, `budget`, `fonds propres`, `bailleur`, `externe`).
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let v = value.trim().to_lowercase();
        if v.is_empty() {
            return None;
        }
        match v.as_str() {
            "internal_budget" | "internal" | "budget" | "bip" | "budget interne"
            | "fonds propres" | "interne" => Some(Self::InternalBudget),
            "external_lender" | "external" | "bailleur" | "externe" | "bailleur de fonds" => {
                Some(Self::ExternalLender)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FundingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
