//! # edc-contracts
//!
//! Contract validation for EDC Marchés360.
//!
//! A contract runs before every mutation: `authorize` checks the acting
//! user's capability, `validate` checks the record as it would be stored.
//! Checks that need the store (uniqueness, values in use) live in the
//! services.

pub mod base;
pub mod library;
pub mod marches;
pub mod projects;
pub mod reference;
pub mod users;

pub use base::*;
