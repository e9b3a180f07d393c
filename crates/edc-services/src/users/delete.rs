//! Delete Service for Users

use edc_contracts::users::DeleteUserContract;
use edc_contracts::Contract;
use edc_core::traits::{Id, UserContext};
use edc_core::EdcResult;
use edc_models::{AuditModule, User};

use crate::context::ServiceContext;
use crate::result::ServiceResult;

pub struct DeleteUserService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> DeleteUserService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, id: Id) -> ServiceResult<User> {
        self.perform(id).await.into()
    }

    async fn perform(&self, id: Id) -> EdcResult<User> {
        let contract = DeleteUserContract::new(self.user);
        contract.authorize()?;
        let record = self.ctx.users.get(id).await?;
        contract.validate(&record)?;

        self.ctx.users.delete(id).await?;
        tracing::info!(user_id = %id, email = %record.email, "user deleted");
        self.ctx
            .audit
            .log(self.user, AuditModule::Users, "delete", record.email.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::*;
    use edc_auth::CurrentUser;
    use edc_models::Role;

    #[tokio::test]
    async fn test_admin_deletes_agent() {
        let ctx = context();
        let target = User::new("Paul", "paul@edc.cm", Role::Agent);
        ctx.users.save(&target).await.unwrap();

        assert!(DeleteUserService::new(&ctx, &actor(Role::Admin)).call(target.id).await.is_success());
        assert!(ctx.users.find(target.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cannot_delete_self() {
        let ctx = context();
        let me = User::new("Admin", "admin@edc.cm", Role::Admin);
        ctx.users.save(&me).await.unwrap();

        let result = DeleteUserService::new(&ctx, &CurrentUser::from(&me)).call(me.id).await;
        assert_eq!(result.status_code(), Some(422));
        assert!(ctx.users.find(me.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_super_admin() {
        let ctx = context();
        let root = User::new("Root", "root@edc.cm", Role::SuperAdmin);
        ctx.users.save(&root).await.unwrap();
        let result = DeleteUserService::new(&ctx, &actor(Role::Admin)).call(root.id).await;
        assert_eq!(result.status_code(), Some(422));
    }
}
