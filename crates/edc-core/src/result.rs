//! Result type aliases and helpers

use crate::error::EdcError;

/// Standard Result type for Marchés360 operations
pub type EdcResult<T> = Result<T, EdcError>;

/// Turn a missing lookup into a `NotFound` error
pub trait OptionExt<T> {
    fn or_not_found(self, entity: &'static str, field: &'static str, value: impl ToString)
        -> EdcResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(
        self,
        entity: &'static str,
        field: &'static str,
        value: impl ToString,
    ) -> EdcResult<T> {
        self.ok_or_else(|| EdcError::not_found(entity, field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_not_found() {
        let missing: Option<u8> = None;
        let err = missing.or_not_found("Project", "id", 42).unwrap_err();
        assert_eq!(err.to_string(), "Not found: Project with id=42");

        assert_eq!(Some(7).or_not_found("Project", "id", 1).unwrap(), 7);
    }
}
