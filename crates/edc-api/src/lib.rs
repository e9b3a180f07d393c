//! # edc-api
//!
//! JSON REST API for EDC Marchés360, mounted under `/api/v1`.
//!
//! Handlers are thin: they extract the caller, call one service and map
//! the outcome to a response. Every error body has the shape
//! `{ "error": code, "message": ..., "details": [...] }`.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod representers;
pub mod routes;

pub use extractors::{AppState, AuthenticatedUser};
pub use routes::router;
