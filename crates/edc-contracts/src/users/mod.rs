//! User contracts

mod base;
mod create;
mod delete;
mod update;

pub use base::{UserBaseContract, UserForm};
pub use create::CreateUserContract;
pub use delete::DeleteUserContract;
pub use update::UpdateUserContract;
