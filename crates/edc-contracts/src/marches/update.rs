//! Update contract for marchés
//!
//! Covers every field-level change: descriptive fields, milestone dates,
//! flags, documents and the execution record.

use edc_core::error::ValidationErrors;
use edc_core::traits::{SoftDeletable, UserContext};
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::{Marche, ReferenceRegistry};

use super::base::MarcheBaseContract;
use crate::base::{require_capability, Contract, ValidationResult};

pub struct UpdateMarcheContract<'a, U: UserContext> {
    base: MarcheBaseContract<'a>,
    user: &'a U,
}

impl<'a, U: UserContext> UpdateMarcheContract<'a, U> {
    pub fn new(user: &'a U, registries: Option<&'a [ReferenceRegistry]>) -> Self {
        Self {
            base: MarcheBaseContract::new(registries),
            user,
        }
    }
}

impl<'a, U: UserContext> Contract<Marche> for UpdateMarcheContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::Write, "edit marchés")
    }

    fn validate(&self, marche: &Marche) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if marche.is_deleted() {
            errors.add_base("Marché is in the trash; restore it before editing");
        }
        if let Err(base_errors) = self.base.validate(marche) {
            errors.merge(base_errors);
        }
        errors.into_result()
    }

    fn is_writable(&self, attribute: &str) -> bool {
        !matches!(
            attribute,
            "id" | "project_id" | "created_at" | "created_by" | "deleted_at" | "deleted_by"
        )
    }
}
