//! Response shapes that differ from the stored records

pub mod document;
pub mod library;
pub mod user;

pub use document::{download_response, DocumentSummary};
pub use library::LibraryEntry;
pub use user::UserRepresentation;
