//! # edc-core
//!
//! Core types, traits, and utilities for EDC Marchés360.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Core traits (Entity, Identifiable, Timestamped, UserContext)
//! - Shared enumerations (capabilities, funding sources, status categories)
//! - Pagination types
//! - Configuration types

pub mod config;
pub mod error;
pub mod pagination;
pub mod result;
pub mod traits;
pub mod types;

pub use error::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
pub use types::*;
