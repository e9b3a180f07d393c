//! Reference-data registries
//!
//! Collection: reference_data
//!
//! Three ordered lists of allowed values feed the marché selectors. Each
//! registry is one document with a fixed id, so there is exactly one per kind.

use chrono::{DateTime, Utc};
use edc_core::traits::{Entity, Id, Identifiable, Timestamped};
use edc_core::{EdcError, EdcResult, ValidationErrors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKind {
    Functions,
    AoTypes,
    PrestationTypes,
}

impl RegistryKind {
    pub const ALL: [RegistryKind; 3] = [Self::Functions, Self::AoTypes, Self::PrestationTypes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Functions => "functions",
            Self::AoTypes => "ao_types",
            Self::PrestationTypes => "prestation_types",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Fixed document id of the registry
    pub fn document_id(&self) -> Id {
        let n = match self {
            Self::Functions => 1,
            Self::AoTypes => 2,
            Self::PrestationTypes => 3,
        };
        Uuid::from_u128(0xedc0_0000_0000_0000_0000_0000_0000_0000 | n)
    }

    pub fn defaults(&self) -> &'static [&'static str] {
        match self {
            Self::Functions => &[
                "Production",
                "Transport",
                "Distribution",
                "Études et ingénierie",
                "Administration générale",
            ],
            Self::AoTypes => &[
                "AONO",
                "AONR",
                "AOIO",
                "AOIR",
                "Demande de cotation",
                "Gré à gré",
            ],
            Self::PrestationTypes => &[
                "Travaux",
                "Fournitures",
                "Services",
                "Prestations intellectuelles",
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRegistry {
    pub id: Id,
    pub kind: RegistryKind,
    pub values: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for ReferenceRegistry {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for ReferenceRegistry {
    fn created_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for ReferenceRegistry {
    const COLLECTION: &'static str = "reference_data";
    const TYPE_NAME: &'static str = "ReferenceRegistry";
}

impl ReferenceRegistry {
    pub fn with_defaults(kind: RegistryKind) -> Self {
        Self {
            id: kind.document_id(),
            kind,
            values: kind.defaults().iter().map(|v| v.to_string()).collect(),
            updated_at: Utc::now(),
        }
    }

    /// Case-insensitive membership
    pub fn contains(&self, value: &str) -> bool {
        let value = value.trim();
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    pub fn add(&mut self, value: &str) -> EdcResult<()> {
        let value = value.trim();
        if value.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("value", "can't be blank");
            return Err(errors.into());
        }
        if self.contains(value) {
            return Err(EdcError::conflict(format!(
                "'{}' already exists in {}",
                value,
                self.kind.as_str()
            )));
        }
        self.values.push(value.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove(&mut self, value: &str) -> EdcResult<()> {
        let pos = self
            .position(value)
            .ok_or_else(|| EdcError::not_found("ReferenceValue", "value", value))?;
        self.values.remove(pos);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn rename(&mut self, from: &str, to: &str) -> EdcResult<()> {
        let pos = self
            .position(from)
            .ok_or_else(|| EdcError::not_found("ReferenceValue", "value", from))?;
        let to = to.trim();
        if to.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("value", "can't be blank");
            return Err(errors.into());
        }
        if self.position(to).is_some_and(|other| other != pos) {
            return Err(EdcError::conflict(format!("'{}' already exists", to)));
        }
        self.values[pos] = to.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }

    fn position(&self, value: &str) -> Option<usize> {
        let value = value.trim();
        self.values.iter().position(|v| v.eq_ignore_ascii_case(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_fixed_ids() {
        let reg = ReferenceRegistry::with_defaults(RegistryKind::PrestationTypes);
        assert!(reg.contains("travaux"));
        assert_ne!(
            RegistryKind::Functions.document_id(),
            RegistryKind::AoTypes.document_id()
        );
        assert_eq!(reg.id, RegistryKind::PrestationTypes.document_id());
    }

    #[test]
    fn test_add_rejects_blank_and_duplicates() {
        let mut reg = ReferenceRegistry::with_defaults(RegistryKind::AoTypes);
        assert_eq!(reg.add("  ").unwrap_err().status_code(), 422);
        assert_eq!(reg.add("aono").unwrap_err().status_code(), 409);
        reg.add("AAO").unwrap();
        assert_eq!(reg.values.last().map(String::as_str), Some("AAO"));
    }

    #[test]
    fn test_rename_and_remove() {
        let mut reg = ReferenceRegistry::with_defaults(RegistryKind::Functions);
        reg.rename("Transport", "Transport HT").unwrap();
        assert!(reg.contains("Transport HT"));
        assert!(reg.rename("Production", "transport ht").is_err());
        // Case-only rename of the same entry is fine.
        reg.rename("Production", "PRODUCTION").unwrap();
        reg.remove("production").unwrap();
        assert_eq!(reg.remove("production").unwrap_err().status_code(), 404);
    }
}
