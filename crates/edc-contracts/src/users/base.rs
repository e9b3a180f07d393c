//! Base contract for users

use edc_core::error::ValidationErrors;
use edc_models::User;
use regex::Regex;
use std::sync::LazyLock;

use crate::base::{validate_present, Contract, ValidationResult};

/// Valid email pattern
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static pattern")
});

const MAX_PASSWORD_LENGTH: usize = 128;

/// A user record plus the clear-text password being set, if any
pub struct UserForm<'a> {
    pub user: &'a User,
    pub password: Option<&'a str>,
}

/// Base contract for users with common validations
pub struct UserBaseContract {
    password_min_length: usize,
}

impl UserBaseContract {
    pub fn new(password_min_length: usize) -> Self {
        Self { password_min_length }
    }

    pub fn validate_email(&self, email: &str, errors: &mut ValidationErrors) {
        if email.trim().is_empty() {
            errors.add("email", "can't be blank");
        } else if !EMAIL_PATTERN.is_match(email.trim()) {
            errors.add("email", "is not a valid email");
        }
    }

    pub fn validate_password(&self, password: Option<&str>, errors: &mut ValidationErrors) {
        let Some(password) = password else {
            return;
        };
        let len = password.chars().count();
        if len < self.password_min_length {
            errors.add(
                "password",
                format!("is too short (minimum is {} characters)", self.password_min_length),
            );
        }
        if len > MAX_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("is too long (maximum is {} characters)", MAX_PASSWORD_LENGTH),
            );
        }
    }
}

impl<'a> Contract<UserForm<'a>> for UserBaseContract {
    fn validate(&self, form: &UserForm<'a>) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_present("name", &form.user.name, 255, &mut errors);
        self.validate_email(&form.user.email, &mut errors);
        self.validate_password(form.password, &mut errors);

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edc_models::Role;

    #[test]
    fn test_valid_user() {
        let user = User::new("Awa Ndiaye", "awa@edc.cm", Role::Agent);
        let form = UserForm { user: &user, password: Some("longenough") };
        assert!(UserBaseContract::new(8).validate(&form).is_ok());
    }

    #[test]
    fn test_invalid_fields() {
        let user = User::new("", "awa@", Role::Agent);
        let form = UserForm { user: &user, password: Some("short") };
        let errors = UserBaseContract::new(8).validate(&form).unwrap_err();
        assert!(errors.has_error("name"));
        assert!(errors.has_error("email"));
        assert!(errors.has_error("password"));
    }
}
