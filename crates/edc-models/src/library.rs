//! Library documents
//!
//! Collection: library
//!
//! Organisation-wide documents (regulations, templates, reports) that are
//! not attached to any marché.

use chrono::{DateTime, Utc};
use edc_core::traits::{new_id, Entity, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::document::DocumentRef;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryCategory {
    Regulation,
    Template,
    Report,
    Guide,
    #[default]
    Other,
}

impl LibraryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regulation => "regulation",
            Self::Template => "template",
            Self::Report => "report",
            Self::Guide => "guide",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryDocument {
    pub id: Id,
    pub title: String,
    pub category: LibraryCategory,
    /// Lower-case file extension (`pdf`, `docx`, ...)
    pub format: String,
    pub document: DocumentRef,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for LibraryDocument {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for LibraryDocument {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for LibraryDocument {
    const COLLECTION: &'static str = "library";
    const TYPE_NAME: &'static str = "LibraryDocument";
}

impl LibraryDocument {
    pub fn new(title: impl Into<String>, category: LibraryCategory, document: DocumentRef) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            category,
            format: document.extension().unwrap_or_default(),
            uploaded_by: document.uploaded_by.clone(),
            created_at: document.uploaded_at,
            document,
        }
    }
}

/// Upload parameters for a library document
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLibraryDocumentDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub category: LibraryCategory,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    /// `data:` URI or bare base64
    #[validate(length(min = 1))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_comes_from_extension() {
        let doc = DocumentRef::from_bytes("Code_Marches.PDF", None, b"x", "Admin");
        let lib = LibraryDocument::new("Code des marchés", LibraryCategory::Regulation, doc);
        assert_eq!(lib.format, "pdf");
        assert_eq!(lib.uploaded_by, "Admin");
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&LibraryCategory::Template).unwrap();
        assert_eq!(json, "\"template\"");
    }
}
