//! API request handlers

pub mod audit;
pub mod auth;
pub mod events;
pub mod execution;
pub mod library;
pub mod marches;
pub mod projects;
pub mod reference;
pub mod transfer;
pub mod trash;
pub mod users;

use serde::Deserialize;

/// A file sent as JSON: `content` is a `data:` URI or bare base64
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    pub content: String,
}
