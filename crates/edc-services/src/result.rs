//! Service Result type

use edc_core::error::ValidationErrors;
use edc_core::{EdcError, EdcResult};

/// Outcome of a service call
///
/// Validation failures keep their field messages in `errors`; any other
/// failure (permission, conflict, not found, store) keeps its cause.
#[derive(Debug)]
pub struct ServiceResult<T> {
    success: bool,
    result: Option<T>,
    errors: ValidationErrors,
    cause: Option<EdcError>,
    message: Option<String>,
}

impl<T> ServiceResult<T> {
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: ValidationErrors::new(),
            cause: None,
            message: None,
        }
    }

    pub fn success_with_message(result: T, message: impl Into<String>) -> Self {
        Self::success(result).with_message(message)
    }

    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            errors,
            cause: None,
            message: None,
        }
    }

    pub fn failure_with_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::failure(errors)
    }

    pub fn failure_with_base_error(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        Self::failure(errors)
    }

    /// Failure carrying a non-validation cause
    pub fn from_error(error: EdcError) -> Self {
        match error {
            EdcError::Validation(errors) => Self::failure(errors),
            other => {
                let mut errors = ValidationErrors::new();
                errors.add_base(other.to_string());
                Self {
                    success: false,
                    result: None,
                    errors,
                    cause: Some(other),
                    message: None,
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<T> {
        self.result.take()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.full_messages()
    }

    /// HTTP status the failure maps to, `None` on success
    pub fn status_code(&self) -> Option<u16> {
        if self.success {
            return None;
        }
        Some(self.cause.as_ref().map_or(422, EdcError::status_code))
    }

    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ServiceResult {
            success: self.success,
            result: self.result.map(f),
            errors: self.errors,
            cause: self.cause,
            message: self.message,
        }
    }

    /// Back to a plain result at the API boundary
    pub fn into_result(self) -> EdcResult<T> {
        if let Some(cause) = self.cause {
            return Err(cause);
        }
        match (self.success, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(EdcError::Internal("service returned no result".into())),
            (false, _) => Err(EdcError::Validation(self.errors)),
        }
    }
}

impl<T> From<EdcResult<T>> for ServiceResult<T> {
    fn from(result: EdcResult<T>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(error) => ServiceResult::from_error(error),
        }
    }
}

impl<T> From<Result<T, ValidationErrors>> for ServiceResult<T> {
    fn from(result: Result<T, ValidationErrors>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(errors) => ServiceResult::failure(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        let result = ServiceResult::success_with_message(42, "done");
        assert!(result.is_success());
        assert_eq!(result.result(), Some(&42));
        assert_eq!(result.message(), Some("done"));
        assert_eq!(result.status_code(), None);
        assert_eq!(result.into_result().unwrap(), 42);
    }

    #[test]
    fn test_validation_failure() {
        let result: ServiceResult<()> = ServiceResult::failure_with_error("name", "can't be blank");
        assert!(result.is_failure());
        assert_eq!(result.full_messages(), vec!["name can't be blank"]);
        assert_eq!(result.status_code(), Some(422));
        assert!(matches!(result.into_result(), Err(EdcError::Validation(_))));
    }

    #[test]
    fn test_cause_is_preserved() {
        let result: ServiceResult<()> = Err(EdcError::conflict("duplicate")).into();
        assert_eq!(result.status_code(), Some(409));
        assert_eq!(result.into_result().unwrap_err().status_code(), 409);
    }

    #[test]
    fn test_map() {
        let result = ServiceResult::success(2).map(|n| n * 10);
        assert_eq!(result.into_result().unwrap(), 20);
    }
}
