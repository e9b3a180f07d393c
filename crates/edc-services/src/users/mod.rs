//! User management services

mod create;
mod delete;
mod update;

pub use create::CreateUserService;
pub use delete::DeleteUserService;
pub use update::UpdateUserService;

use edc_contracts::require_capability;
use edc_core::traits::{Id, UserContext};
use edc_core::types::Capability;
use edc_core::{EdcError, EdcResult};
use edc_models::user::normalize_email;
use edc_models::User;

use crate::context::ServiceContext;

/// Every account, ordered by name
pub async fn list_users<U: UserContext>(ctx: &ServiceContext, user: &U) -> EdcResult<Vec<User>> {
    require_capability(user, Capability::ManageUsers, "manage users")?;
    let mut users = ctx.users.all().await?;
    users.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(users)
}

/// Managers see any account, everyone else only their own
pub async fn get_user<U: UserContext>(ctx: &ServiceContext, user: &U, id: Id) -> EdcResult<User> {
    if user.user_id() != id || !user.is_logged_in() {
        require_capability(user, Capability::ManageUsers, "manage users")?;
    }
    ctx.users.get(id).await
}

pub async fn find_by_email(ctx: &ServiceContext, email: &str) -> EdcResult<Option<User>> {
    let email = normalize_email(email);
    Ok(ctx.users.filter(|u| u.email == email).await?.into_iter().next())
}

pub(crate) async fn ensure_email_available(
    ctx: &ServiceContext,
    email: &str,
    except: Option<Id>,
) -> EdcResult<()> {
    match find_by_email(ctx, email).await? {
        Some(existing) if Some(existing.id) != except => Err(EdcError::conflict(format!(
            "email '{}' is already registered",
            existing.email
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::*;
    use edc_auth::CurrentUser;
    use edc_models::Role;

    #[tokio::test]
    async fn test_list_requires_manage_users() {
        let ctx = context();
        ctx.users.save(&User::new("Zoé", "zoe@edc.cm", Role::Agent)).await.unwrap();
        ctx.users.save(&User::new("awa", "awa@edc.cm", Role::Viewer)).await.unwrap();

        let users = list_users(&ctx, &actor(Role::Admin)).await.unwrap();
        assert_eq!(users[0].name, "awa");
        assert_eq!(list_users(&ctx, &actor(Role::Agent)).await.unwrap_err().status_code(), 403);
    }

    #[tokio::test]
    async fn test_users_can_read_themselves() {
        let ctx = context();
        let record = User::new("Awa", "awa@edc.cm", Role::Viewer);
        ctx.users.save(&record).await.unwrap();

        let me = CurrentUser::from(&record);
        assert_eq!(get_user(&ctx, &me, record.id).await.unwrap().email, "awa@edc.cm");

        let other = User::new("Paul", "paul@edc.cm", Role::Viewer);
        ctx.users.save(&other).await.unwrap();
        assert_eq!(get_user(&ctx, &me, other.id).await.unwrap_err().status_code(), 403);
    }

    #[tokio::test]
    async fn test_email_lookup_is_normalized() {
        let ctx = context();
        let record = User::new("Awa", "awa@edc.cm", Role::Viewer);
        ctx.users.save(&record).await.unwrap();

        assert!(find_by_email(&ctx, "  AWA@edc.cm ").await.unwrap().is_some());
        assert_eq!(
            ensure_email_available(&ctx, "Awa@EDC.cm", None).await.unwrap_err().status_code(),
            409
        );
        assert!(ensure_email_available(&ctx, "awa@edc.cm", Some(record.id)).await.is_ok());
    }
}
