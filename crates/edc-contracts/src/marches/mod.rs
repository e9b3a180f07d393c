//! Marché contracts

mod base;
mod create;
mod trash;
mod update;

pub use base::MarcheBaseContract;
pub use create::CreateMarcheContract;
pub use trash::{DeleteMarcheContract, PurgeMarcheContract, RestoreMarcheContract};
pub use update::UpdateMarcheContract;
