//! # edc-models
//!
//! Domain models for EDC Marchés360.
//!
//! Every persisted record implements the core traits from `edc-core`
//! (Entity, Identifiable, Timestamped). The milestone catalogue, status
//! derivation and phase gating are pure functions over these records.

pub use edc_core::traits::{Entity, Id, Identifiable, ProjectScoped, SoftDeletable, Timestamped};

pub mod audit;
pub mod document;
pub mod execution;
pub mod library;
pub mod marche;
pub mod milestone;
pub mod phase;
pub mod project;
pub mod reference;
pub mod role;
pub mod status;
pub mod user;

pub use audit::{AuditEntry, AuditModule};
pub use document::DocumentRef;
pub use execution::{Avenant, ContractRef, Decompte, Execution, Termination, TerminationStage};
pub use library::{CreateLibraryDocumentDto, LibraryCategory, LibraryDocument};
pub use marche::{dossier_key, CreateMarcheDto, DateKind, Marche, MarcheFlags, MarcheView, UpdateMarcheDto};
pub use milestone::{Milestone, MilestoneGroup};
pub use phase::{accessible_groups, is_phase_accessible, phase_limit};
pub use project::{CreateProjectDto, Project, UpdateProjectDto};
pub use reference::{ReferenceRegistry, RegistryKind};
pub use role::Role;
pub use status::{derive_status, lateness, Lateness, StatusReport};
pub use user::{NewUser, UpdateUser, User};
