//! Update Service for Users

use chrono::Utc;
use edc_auth::hash_password;
use edc_contracts::users::{UpdateUserContract, UserForm};
use edc_contracts::{merge_validator_errors, Contract};
use edc_core::error::ValidationErrors;
use edc_core::traits::{Id, UserContext};
use edc_core::EdcResult;
use edc_models::{AuditModule, UpdateUser, User};
use validator::Validate;

use super::ensure_email_available;
use crate::context::ServiceContext;
use crate::result::ServiceResult;

pub struct UpdateUserService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> UpdateUserService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, id: Id, params: UpdateUser) -> ServiceResult<User> {
        self.perform(id, params).await.into()
    }

    async fn perform(&self, id: Id, params: UpdateUser) -> EdcResult<User> {
        let before = self.ctx.users.get(id).await?;
        let contract = UpdateUserContract::new(self.user, &before, self.ctx.settings.password_min_length);
        contract.authorize()?;

        let mut errors = ValidationErrors::new();
        merge_validator_errors(&mut errors, params.validate());

        let mut record = before.clone();
        params.apply_to(&mut record);
        let form = UserForm {
            user: &record,
            password: params.password.as_deref(),
        };
        if let Err(contract_errors) = contract.validate(&form) {
            errors.merge(contract_errors);
        }
        errors.into_result()?;

        if record.email != before.email {
            ensure_email_available(self.ctx, &record.email, Some(id)).await?;
        }
        if let Some(password) = params.password.as_deref() {
            record.password_hash = Some(hash_password(password)?);
        }
        record.updated_at = Utc::now();

        self.ctx.users.save(&record).await?;
        tracing::info!(user_id = %id, "user updated");
        self.ctx.audit.log(
            self.user,
            AuditModule::Users,
            "update",
            describe_changes(&before, &record, params.password.is_some()),
        );
        Ok(record)
    }
}

fn describe_changes(before: &User, after: &User, password: bool) -> String {
    let mut changes = Vec::new();
    if before.name != after.name {
        changes.push(format!("name: {} -> {}", before.name, after.name));
    }
    if before.email != after.email {
        changes.push(format!("email: {} -> {}", before.email, after.email));
    }
    if before.role != after.role {
        changes.push(format!("role: {} -> {}", before.role.as_str(), after.role.as_str()));
    }
    if before.status != after.status {
        changes.push(format!("status: {:?} -> {:?}", before.status, after.status));
    }
    if password {
        changes.push("password reset".to_string());
    }
    if changes.is_empty() {
        format!("{}: no changes", after.email)
    } else {
        format!("{}: {}", after.email, changes.join(", "))
    }
}
