//! Base contract system

use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::{EdcError, EdcResult};

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Base contract trait
pub trait Contract<T: ?Sized>: Send + Sync {
    /// Permission check, run before any validation
    fn authorize(&self) -> EdcResult<()> {
        Ok(())
    }

    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;

    /// Check if an attribute is writable
    fn is_writable(&self, _attribute: &str) -> bool {
        true
    }

    /// Authorize, then validate
    fn check(&self, entity: &T) -> EdcResult<()> {
        self.authorize()?;
        self.validate(entity).map_err(EdcError::from)
    }
}

/// Fail with 403 unless the user holds `capability`
pub fn require_capability<U: UserContext + ?Sized>(
    user: &U,
    capability: Capability,
    action: &str,
) -> EdcResult<()> {
    if !user.is_logged_in() {
        return Err(EdcError::unauthorized("You need to sign in"));
    }
    if !user.allowed(capability) {
        return Err(EdcError::forbidden(format!(
            "You are not authorized to {} (requires {})",
            action, capability
        )));
    }
    Ok(())
}

/// Fold `validator` derive errors into our collection
pub fn merge_validator_errors(errors: &mut ValidationErrors, result: Result<(), validator::ValidationErrors>) {
    let Err(found) = result else {
        return;
    };
    let mut fields: Vec<_> = found.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    for (field, field_errors) in fields {
        for error in field_errors {
            let message = match &error.message {
                Some(message) => message.to_string(),
                None => describe_code(&error.code),
            };
            errors.add(field, message);
        }
    }
}

fn describe_code(code: &str) -> String {
    match code {
        "length" => "has an invalid length".to_string(),
        "range" => "is out of range".to_string(),
        "email" => "is not a valid email".to_string(),
        "required" => "can't be blank".to_string(),
        other => format!("is invalid ({})", other),
    }
}

/// Blank check shared by the contracts
pub fn validate_present(field: &str, value: &str, max: usize, errors: &mut ValidationErrors) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "can't be blank");
    } else if value.chars().count() > max {
        errors.add(field, format!("is too long (maximum is {} characters)", max));
    }
}

/// Amounts must be finite and non-negative
pub fn validate_amount(field: &str, value: f64, errors: &mut ValidationErrors) {
    if !value.is_finite() {
        errors.add(field, "is not a number");
    } else if value < 0.0 {
        errors.add(field, "must be greater than or equal to 0");
    }
}

// ============================================================================
// Tests
// ============================================================================
