//! Reference-data contract
//!
//! Editing the registries is a system setting. Values in use are checked
//! by the service before removal.

use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::EdcResult;

use crate::base::{require_capability, validate_present, Contract, ValidationResult};

pub const MAX_VALUE_LENGTH: usize = 100;

pub struct ReferenceValueContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> ReferenceValueContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<str> for ReferenceValueContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::ConfigureSystem, "edit reference data")
    }

    fn validate(&self, value: &str) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_present("value", value, MAX_VALUE_LENGTH, &mut errors);
        errors.into_result()
    }
}
