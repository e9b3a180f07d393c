//! Trash: soft delete, restore, purge

use edc_contracts::marches::{DeleteMarcheContract, PurgeMarcheContract, RestoreMarcheContract};
use edc_contracts::{require_capability, Contract};
use edc_core::traits::{Id, SoftDeletable, UserContext};
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::{AuditModule, Marche};

use crate::context::{can_read_payloads, require_login, ServiceContext};
use crate::result::ServiceResult;

/// Trashed marchés, most recently deleted first
pub async fn list_trash<U: UserContext>(ctx: &ServiceContext, user: &U) -> EdcResult<Vec<Marche>> {
    require_login(user)?;
    let mut trashed = ctx.marches.filter(|m| m.is_deleted()).await?;
    trashed.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
    let payloads = can_read_payloads(user);
    Ok(trashed.into_iter().map(|m| super::readable(m, payloads)).collect())
}

pub struct TrashService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> TrashService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    /// Move a marché to the trash
    pub async fn trash(self, id: Id) -> ServiceResult<Marche> {
        self.perform_trash(id).await.into()
    }

    pub async fn restore(self, id: Id) -> ServiceResult<Marche> {
        self.perform_restore(id).await.into()
    }

    /// Delete a trashed marché for good
    pub async fn purge(self, id: Id) -> ServiceResult<Marche> {
        self.perform_purge(id).await.into()
    }

    /// Purge every trashed marché; returns how many were removed
    pub async fn empty(self) -> ServiceResult<usize> {
        self.perform_empty().await.into()
    }

    async fn perform_trash(&self, id: Id) -> EdcResult<Marche> {
        let mut marche = self.ctx.marches.get(id).await?;
        DeleteMarcheContract::new(self.user).check(&marche)?;

        marche.soft_delete(self.user.display_name());
        self.ctx.marches.save(&marche).await?;
        self.ctx.audit.log(
            self.user,
            AuditModule::Trash,
            "delete",
            marche.numero_dossier.clone(),
        );
        Ok(marche)
    }

    async fn perform_restore(&self, id: Id) -> EdcResult<Marche> {
        let mut marche = self.ctx.marches.get(id).await?;
        RestoreMarcheContract::new(self.user).check(&marche)?;

        marche.restore();
        self.ctx.marches.save(&marche).await?;
        self.ctx.audit.log(
            self.user,
            AuditModule::Trash,
            "restore",
            marche.numero_dossier.clone(),
        );
        Ok(marche)
    }

    async fn perform_purge(&self, id: Id) -> EdcResult<Marche> {
        let marche = self.ctx.marches.get(id).await?;
        PurgeMarcheContract::new(self.user).check(&marche)?;

        self.ctx.marches.delete(id).await?;
        tracing::info!(marche_id = %id, numero = %marche.numero_dossier, "marché purged");
        self.ctx.audit.log(
            self.user,
            AuditModule::Trash,
            "purge",
            marche.numero_dossier.clone(),
        );
        Ok(marche)
    }

    async fn perform_empty(&self) -> EdcResult<usize> {
        require_capability(self.user, Capability::ConfigureSystem, "empty the trash")?;

        let trashed = self.ctx.marches.filter(|m| m.is_deleted()).await?;
        for marche in &trashed {
            self.ctx.marches.delete(marche.id).await?;
        }
        if !trashed.is_empty() {
            self.ctx.audit.log(
                self.user,
                AuditModule::Trash,
                "empty",
                format!("{} marché(s) purged", trashed.len()),
            );
        }
        Ok(trashed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::*;
    use crate::marches::{list_marches, MarcheFilter};
    use edc_models::Role;
    use uuid::Uuid;

    async fn seeded(ctx: &ServiceContext) -> Marche {
        let m = Marche::new(Uuid::new_v4(), "M-1", "Objet");
        ctx.marches.save(&m).await.unwrap();
        m
    }

    #[tokio::test]
    async fn test_trash_and_restore() {
        let ctx = context();
        let m = seeded(&ctx).await;
        let agent = actor(Role::Agent);

        let trashed = TrashService::new(&ctx, &agent).trash(m.id).await.into_result().unwrap();
        assert_eq!(trashed.deleted_by.as_deref(), Some(agent.name.as_str()));
        assert!(list_marches(&ctx, &agent, &MarcheFilter::default()).await.unwrap().is_empty());
        assert_eq!(list_trash(&ctx, &agent).await.unwrap().len(), 1);

        assert!(TrashService::new(&ctx, &agent).restore(m.id).await.is_success());
        assert_eq!(list_marches(&ctx, &agent, &MarcheFilter::default()).await.unwrap().len(), 1);
        assert!(list_trash(&ctx, &agent).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purge_needs_configure_system() {
        let ctx = context();
        let m = seeded(&ctx).await;
        TrashService::new(&ctx, &actor(Role::Agent)).trash(m.id).await.into_result().unwrap();

        let denied = TrashService::new(&ctx, &actor(Role::Admin)).purge(m.id).await;
        assert_eq!(denied.status_code(), Some(403));

        assert!(TrashService::new(&ctx, &actor(Role::SuperAdmin)).purge(m.id).await.is_success());
        assert!(ctx.marches.find(m.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_live_marche_cannot_be_purged() {
        let ctx = context();
        let m = seeded(&ctx).await;
        let result = TrashService::new(&ctx, &actor(Role::SuperAdmin)).purge(m.id).await;
        assert_eq!(result.status_code(), Some(422));
    }

    #[tokio::test]
    async fn test_empty_trash() {
        let ctx = context();
        let a = seeded(&ctx).await;
        seeded(&ctx).await;
        TrashService::new(&ctx, &actor(Role::Agent)).trash(a.id).await.into_result().unwrap();

        let purged = TrashService::new(&ctx, &actor(Role::SuperAdmin)).empty().await.into_result().unwrap();
        assert_eq!(purged, 1);
        assert_eq!(ctx.marches.all().await.unwrap().len(), 1);
    }
}
