//! Document references
//!
//! Uploaded files are kept inline as `data:` URIs. The whole payload lives
//! in the record; there is no separate blob storage.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use edc_core::{EdcError, EdcResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A file attached to a marché, a project or the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub file_name: String,
    pub mime_type: String,
    /// Decoded size in bytes
    pub size: u64,
    /// `data:<mime>;base64,<payload>`, empty once redacted
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data_uri: String,
    /// SHA256 of the decoded bytes, hex encoded
    pub digest: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
}

impl DocumentRef {
    /// Build a reference from raw bytes, guessing the MIME type from the
    /// file name when none is given
    pub fn from_bytes(
        file_name: impl Into<String>,
        mime_type: Option<&str>,
        bytes: &[u8],
        uploaded_by: impl Into<String>,
    ) -> Self {
        let file_name = file_name.into();
        let mime_type = match mime_type.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None => guess_mime(&file_name),
        };

        Self {
            data_uri: format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)),
            digest: digest(bytes),
            size: bytes.len() as u64,
            file_name,
            mime_type,
            uploaded_at: Utc::now(),
            uploaded_by: uploaded_by.into(),
        }
    }

    /// Build a reference from a `data:` URI or a bare base64 payload
    pub fn from_data_uri(
        file_name: impl Into<String>,
        data_uri: &str,
        uploaded_by: impl Into<String>,
    ) -> EdcResult<Self> {
        let (mime, payload) = split_data_uri(data_uri)?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| EdcError::Validation(invalid_payload(e.to_string())))?;
        Ok(Self::from_bytes(file_name, mime, &bytes, uploaded_by))
    }

    /// Decode the payload back to bytes
    pub fn decode(&self) -> EdcResult<Vec<u8>> {
        let (_, payload) = split_data_uri(&self.data_uri)?;
        STANDARD
            .decode(payload)
            .map_err(|e| EdcError::Internal(format!("corrupt document payload: {}", e)))
    }

    /// Drop the payload, keeping the metadata
    pub fn redact(&mut self) {
        self.data_uri.clear();
    }

    pub fn is_redacted(&self) -> bool {
        self.data_uri.is_empty()
    }

    /// Lower-case file extension, if any
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

pub fn guess_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn invalid_payload(message: String) -> edc_core::ValidationErrors {
    let mut errors = edc_core::ValidationErrors::new();
    errors.add("data_uri", format!("is not valid base64 ({})", message));
    errors
}

/// Split into (declared mime, base64 payload). Bare base64 has no mime.
fn split_data_uri(data_uri: &str) -> EdcResult<(Option<&str>, &str)> {
    let Some(rest) = data_uri.strip_prefix("data:") else {
        return Ok((None, data_uri));
    };
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| EdcError::Validation(invalid_payload("missing ','".into())))?;
    let Some(mime) = header.strip_suffix(";base64") else {
        return Err(EdcError::Validation(invalid_payload(
            "only base64 data URIs are accepted".into(),
        )));
    };
    Ok(((!mime.is_empty()).then_some(mime), payload))
}
