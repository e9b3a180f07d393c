//! Document metadata and file downloads

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use edc_models::DocumentRef;
use serde::Serialize;

use crate::error::ApiResult;

/// A document without its payload
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub digest: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
}

impl From<&DocumentRef> for DocumentSummary {
    fn from(doc: &DocumentRef) -> Self {
        Self {
            file_name: doc.file_name.clone(),
            mime_type: doc.mime_type.clone(),
            size: doc.size,
            digest: doc.digest.clone(),
            uploaded_at: doc.uploaded_at,
            uploaded_by: doc.uploaded_by.clone(),
        }
    }
}

/// Raw bytes with the stored MIME type, offered as an attachment
pub fn download_response(doc: &DocumentRef) -> ApiResult<Response> {
    let bytes = doc.decode()?;
    let content_type = HeaderValue::from_str(&doc.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        doc.file_name.replace(['"', '\\'], "_")
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_summary_drops_payload() {
        let doc = DocumentRef::from_bytes("pv.pdf", None, b"%PDF", "Agent");
        let json = serde_json::to_value(DocumentSummary::from(&doc)).unwrap();
        assert!(json.get("data_uri").is_none());
        assert_eq!(json["size"], 4);
    }

    #[test]
    fn test_download_headers() {
        let doc = DocumentRef::from_bytes("pv.pdf", None, b"%PDF", "Agent");
        let response = download_response(&doc).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"pv.pdf\""
        );
    }
}
