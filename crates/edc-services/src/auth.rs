//! Sign-in, token resolution and account bootstrap

use chrono::Utc;
use edc_auth::{hash_password, verify_password, AuthError, CurrentUser, JwtService};
use edc_contracts::users::UserBaseContract;
use edc_core::config::BootstrapAdmin;
use edc_core::error::ValidationErrors;
use edc_core::traits::UserContext;
use edc_core::EdcResult;
use edc_models::{AuditModule, Role, User};

use crate::context::{require_login, ServiceContext};
use crate::result::ServiceResult;
use crate::users::find_by_email;

/// A freshly issued bearer token and the account it belongs to
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

pub struct LoginService<'a> {
    ctx: &'a ServiceContext,
    jwt: &'a JwtService,
}

impl<'a> LoginService<'a> {
    pub fn new(ctx: &'a ServiceContext, jwt: &'a JwtService) -> Self {
        Self { ctx, jwt }
    }

    pub async fn call(self, email: &str, password: &str) -> ServiceResult<Session> {
        self.perform(email, password).await.into()
    }

    async fn perform(&self, email: &str, password: &str) -> EdcResult<Session> {
        let Some(mut user) = find_by_email(self.ctx, email).await? else {
            tracing::warn!(email = %email.trim(), "sign-in with unknown email");
            return Err(AuthError::InvalidCredentials.into());
        };

        let verified = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash));
        if !verified {
            tracing::warn!(user_id = %user.id, "sign-in with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }
        if !user.active() {
            return Err(AuthError::AccountDisabled.into());
        }

        let token = self.jwt.create_token(&user).map_err(AuthError::from)?;
        user.last_login_at = Some(Utc::now());
        self.ctx.users.save(&user).await?;

        tracing::info!(user_id = %user.id, "user signed in");
        self.ctx
            .audit
            .log(&CurrentUser::from(&user), AuditModule::Auth, "login", user.email.clone());

        Ok(Session {
            token,
            expires_in: self.jwt.ttl_seconds(),
            user,
        })
    }
}

/// Resolve a bearer token to the current state of its account
///
/// Role and status come from the stored record, not from the token, so a
/// demoted or disabled account loses its rights immediately.
pub async fn authenticate(ctx: &ServiceContext, jwt: &JwtService, token: &str) -> EdcResult<CurrentUser> {
    let user_id = jwt.get_user_id(token).map_err(AuthError::from)?;
    let user = ctx
        .users
        .find(user_id)
        .await?
        .ok_or(AuthError::NotAuthenticated)?;
    if !user.active() {
        return Err(AuthError::AccountDisabled.into());
    }
    Ok(CurrentUser::from(&user))
}

/// Create the first super administrator when none exists
///
/// Returns the created account, or `None` when one was already there.
pub async fn bootstrap_admin(ctx: &ServiceContext, admin: &BootstrapAdmin) -> EdcResult<Option<User>> {
    let has_root = !ctx
        .users
        .filter(|u| u.role == Role::SuperAdmin)
        .await?
        .is_empty();
    if has_root {
        return Ok(None);
    }

    let mut user = User::new(admin.name.trim(), &admin.email, Role::SuperAdmin);
    user.password_hash = Some(hash_password(&admin.password)?);
    ctx.users.save(&user).await?;

    tracing::info!(email = %user.email, "bootstrap super administrator created");
    ctx.audit
        .record_now(edc_models::AuditEntry::new(
            &CurrentUser::system(),
            AuditModule::Users,
            "bootstrap",
            user.email.clone(),
        ))
        .await?;
    Ok(Some(user))
}

pub struct ChangePasswordService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> ChangePasswordService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, current: &str, new_password: &str) -> ServiceResult<()> {
        self.perform(current, new_password).await.into()
    }

    async fn perform(&self, current: &str, new_password: &str) -> EdcResult<()> {
        require_login(self.user)?;
        let mut record = self.ctx.users.get(self.user.user_id()).await?;

        let matches = record
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(current, hash));
        if !matches {
            let mut errors = ValidationErrors::new();
            errors.add("current_password", "is incorrect");
            return Err(errors.into());
        }

        let mut errors = ValidationErrors::new();
        UserBaseContract::new(self.ctx.settings.password_min_length)
            .validate_password(Some(new_password), &mut errors);
        errors.into_result()?;

        record.password_hash = Some(hash_password(new_password)?);
        record.updated_at = Utc::now();
        self.ctx.users.save(&record).await?;

        self.ctx
            .audit
            .log(self.user, AuditModule::Auth, "change_password", record.email.clone());
        Ok(())
    }
}
