//! Create Service for Users

use edc_auth::hash_password;
use edc_contracts::users::{CreateUserContract, UserForm};
use edc_contracts::{merge_validator_errors, Contract};
use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::EdcResult;
use edc_models::{AuditModule, NewUser, User};
use validator::Validate;

use super::ensure_email_available;
use crate::context::ServiceContext;
use crate::result::ServiceResult;

pub struct CreateUserService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> CreateUserService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, params: NewUser) -> ServiceResult<User> {
        self.perform(params).await.into()
    }

    async fn perform(&self, params: NewUser) -> EdcResult<User> {
        let contract = CreateUserContract::new(self.user, self.ctx.settings.password_min_length);
        contract.authorize()?;

        let mut errors = ValidationErrors::new();
        merge_validator_errors(&mut errors, params.validate());

        let password = params.password.clone();
        let mut record = User::from(params);
        record.name = record.name.trim().to_string();
        let form = UserForm {
            user: &record,
            password: password.as_deref(),
        };
        if let Err(contract_errors) = contract.validate(&form) {
            errors.merge(contract_errors);
        }
        errors.into_result()?;

        ensure_email_available(self.ctx, &record.email, None).await?;
        if let Some(password) = password.as_deref() {
            record.password_hash = Some(hash_password(password)?);
        }

        self.ctx.users.save(&record).await?;
        tracing::info!(user_id = %record.id, email = %record.email, role = %record.role.as_str(), "user created");
        self.ctx.audit.log(
            self.user,
            AuditModule::Users,
            "create",
            format!("{} ({})", record.email, record.role.as_str()),
        );
        Ok(record)
    }
}
