//! Import errors

use edc_core::EdcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unreadable CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("the file is empty")]
    EmptyFile,

    #[error("no valid rows found")]
    NoValidRows,

    #[error("export failed: {0}")]
    Write(String),
}

impl From<ImportError> for EdcError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Write(message) => EdcError::Internal(message),
            other => EdcError::Import(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(EdcError::from(ImportError::NoValidRows).status_code(), 422);
        assert_eq!(EdcError::from(ImportError::EmptyFile).status_code(), 422);
        assert_eq!(EdcError::from(ImportError::Write("io".into())).status_code(), 500);
        assert_eq!(ImportError::NoValidRows.to_string(), "no valid rows found");
    }
}
