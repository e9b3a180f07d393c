//! Library listing entries

use chrono::{DateTime, Utc};
use edc_core::traits::Id;
use edc_models::{LibraryCategory, LibraryDocument};
use serde::Serialize;

use super::DocumentSummary;

/// A library document without its payload; fetch `/library/:id/download` for the bytes
#[derive(Debug, Clone, Serialize)]
pub struct LibraryEntry {
    pub id: Id,
    pub title: String,
    pub category: LibraryCategory,
    pub format: String,
    pub document: DocumentSummary,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<&LibraryDocument> for LibraryEntry {
    fn from(doc: &LibraryDocument) -> Self {
        Self {
            id: doc.id,
            title: doc.title.clone(),
            category: doc.category,
            format: doc.format.clone(),
            document: DocumentSummary::from(&doc.document),
            uploaded_by: doc.uploaded_by.clone(),
            created_at: doc.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edc_models::DocumentRef;

    #[test]
    fn test_entry_has_no_payload() {
        let doc = LibraryDocument::new(
            "Code des marchés",
            LibraryCategory::Regulation,
            DocumentRef::from_bytes("code.pdf", None, b"%PDF-1.4", "Admin"),
        );
        let json = serde_json::to_value(LibraryEntry::from(&doc)).unwrap();
        assert_eq!(json["category"], "regulation");
        assert_eq!(json["format"], "pdf");
        assert!(json["document"].get("data_uri").is_none());
    }
}
