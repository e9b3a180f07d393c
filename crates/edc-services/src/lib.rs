//! # edc-services
//!
//! Business logic services for EDC Marchés360.
//!
//! Each mutation is a service object: it loads the record, applies the
//! change, runs the matching contract, persists through the store and
//! appends an audit entry. Services return a [`ServiceResult`]; reads
//! return `EdcResult` directly.

pub mod audit;
pub mod auth;
pub mod context;
pub mod library;
pub mod marches;
pub mod projects;
pub mod reference;
pub mod result;
pub mod users;

pub use context::{require_login, ServiceContext, ServiceSettings};
pub use result::ServiceResult;
