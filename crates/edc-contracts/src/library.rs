//! Library document contracts

use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::LibraryDocument;

use crate::base::{require_capability, validate_present, Contract, ValidationResult};

pub struct CreateLibraryDocumentContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> CreateLibraryDocumentContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<LibraryDocument> for CreateLibraryDocumentContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::Write, "publish library documents")
    }

    fn validate(&self, doc: &LibraryDocument) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_present("title", &doc.title, 255, &mut errors);
        validate_present("file_name", &doc.document.file_name, 255, &mut errors);
        if doc.document.size == 0 {
            errors.add("content", "is empty");
        }
        errors.into_result()
    }
}

pub struct DeleteLibraryDocumentContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> DeleteLibraryDocumentContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<LibraryDocument> for DeleteLibraryDocumentContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::Write, "remove library documents")
    }

    fn validate(&self, _doc: &LibraryDocument) -> ValidationResult {
        Ok(())
    }

    fn is_writable(&self, _attribute: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::MockUser;
    use edc_models::{DocumentRef, LibraryCategory};

    #[test]
    fn test_empty_upload_is_rejected() {
        let agent = MockUser::with(&[Capability::Write]);
        let doc = LibraryDocument::new(
            "Guide",
            LibraryCategory::Guide,
            DocumentRef::from_bytes("guide.pdf", None, b"", "Mock"),
        );
        let errors = CreateLibraryDocumentContract::new(&agent).validate(&doc).unwrap_err();
        assert!(errors.has_error("content"));
    }

    #[test]
    fn test_viewer_cannot_publish() {
        let viewer = MockUser::with(&[Capability::Download]);
        let doc = LibraryDocument::new(
            "Guide",
            LibraryCategory::Guide,
            DocumentRef::from_bytes("guide.pdf", None, b"x", "Mock"),
        );
        assert!(CreateLibraryDocumentContract::new(&viewer).check(&doc).is_err());
        assert!(DeleteLibraryDocumentContract::new(&viewer).check(&doc).is_err());
    }
}
