//! Core error types for EDC Marchés360
//!
//! One taxonomy for the whole workspace: validation problems are collected
//! field by field, everything else is a single variant carrying a message.

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for all Marchés360 operations
#[derive(Error, Debug)]
pub enum EdcError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EdcError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        EdcError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        EdcError::Forbidden {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        EdcError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        EdcError::Conflict {
            message: message.into(),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            EdcError::NotFound { .. } => 404,
            EdcError::Unauthorized { .. } => 401,
            EdcError::Forbidden { .. } => 403,
            EdcError::Validation(_) | EdcError::Contract(_) | EdcError::Import(_) => 422,
            EdcError::Conflict { .. } => 409,
            EdcError::Store(_) | EdcError::Internal(_) | EdcError::Config(_) => 500,
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            EdcError::NotFound { .. } => "not_found",
            EdcError::Unauthorized { .. } => "unauthorized",
            EdcError::Forbidden { .. } => "forbidden",
            EdcError::Validation(_) => "validation_failed",
            EdcError::Contract(_) => "contract_violated",
            EdcError::Conflict { .. } => "conflict",
            EdcError::Store(_) => "store_error",
            EdcError::Import(_) => "import_failed",
            EdcError::Internal(_) => "internal_error",
            EdcError::Config(_) => "configuration_error",
        }
    }

    /// Human-readable detail lines (one per validation message)
    pub fn details(&self) -> Vec<String> {
        match self {
            EdcError::Validation(errors) => errors.full_messages(),
            EdcError::Contract(err) => ValidationErrors::from(err.clone()).full_messages(),
            _ => Vec::new(),
        }
    }
}

/// Validation errors collection
///
/// Field errors are kept in a sorted map so messages come out in a stable order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: BTreeMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// Turn the collection into a `Result`, `Ok` when empty
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Contract validation error
#[derive(Error, Debug, Clone)]
pub enum ContractError {
    #[error("Attribute {attribute} is invalid: {message}")]
    AttributeInvalid { attribute: String, message: String },

    #[error("Attribute {attribute} is not writable")]
    AttributeNotWritable { attribute: String },

    #[error("Base contract error: {message}")]
    Base { message: String },

    #[error("Multiple contract errors")]
    Multiple { errors: ValidationErrors },
}

impl From<ContractError> for ValidationErrors {
    fn from(err: ContractError) -> Self {
        let mut errors = ValidationErrors::new();
        match err {
            ContractError::AttributeInvalid { attribute, message } => {
                errors.add(attribute, message);
            }
            ContractError::AttributeNotWritable { attribute } => {
                errors.add(attribute, "is not writable");
            }
            ContractError::Base { message } => {
                errors.add_base(message);
            }
            ContractError::Multiple { errors: e } => {
                return e;
            }
        }
        errors
    }
}
