//! # edc-auth
//!
//! Authentication and authorization for EDC Marchés360.
//!
//! ## Features
//!
//! - Static role → capability table
//! - `CurrentUser`, the authenticated principal seen by contracts and services
//! - Argon2 password hashing
//! - HS256 bearer tokens

pub mod jwt;
pub mod password;
pub mod permissions;

pub use jwt::{extract_bearer_token, Claims, JwtError, JwtService};
pub use password::{hash_password, verify_password, AuthError};
pub use permissions::{role_allows, CurrentUser};
