//! Password hashing and authentication errors

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use edc_core::EdcError;
use thiserror::Error;

use crate::jwt::JwtError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account is disabled")]
    AccountDisabled,
    #[error("Authentication required")]
    NotAuthenticated,
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Token(#[from] JwtError),
}

impl From<AuthError> for EdcError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AccountDisabled => EdcError::forbidden(err.to_string()),
            AuthError::Hashing(message) => EdcError::Internal(message),
            AuthError::Token(JwtError::EncodingFailed(message)) => EdcError::Internal(message),
            other => EdcError::unauthorized(other.to_string()),
        }
    }
}

/// Hash a password into an Argon2 PHC string
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a stored PHC string
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
