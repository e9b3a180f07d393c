//! Reference-data services
//!
//! Three registries of allowed values. A registry that was never edited is
//! served from its defaults. Renaming a value rewrites the marchés using
//! it; removing a value still used by a live marché is refused.

use edc_contracts::reference::ReferenceValueContract;
use edc_contracts::Contract;
use edc_core::traits::{SoftDeletable, UserContext};
use edc_core::{EdcError, EdcResult};
use edc_models::{AuditModule, Marche, ReferenceRegistry, RegistryKind};

use crate::context::{require_login, ServiceContext};
use crate::result::ServiceResult;

/// Every registry, stored or default
pub async fn load_registries(ctx: &ServiceContext) -> EdcResult<Vec<ReferenceRegistry>> {
    let mut registries = Vec::with_capacity(RegistryKind::ALL.len());
    for kind in RegistryKind::ALL {
        registries.push(load_registry(ctx, kind).await?);
    }
    Ok(registries)
}

async fn load_registry(ctx: &ServiceContext, kind: RegistryKind) -> EdcResult<ReferenceRegistry> {
    Ok(ctx
        .registries
        .find(kind.document_id())
        .await?
        .unwrap_or_else(|| ReferenceRegistry::with_defaults(kind)))
}

pub async fn get_registry<U: UserContext>(
    ctx: &ServiceContext,
    user: &U,
    kind: RegistryKind,
) -> EdcResult<ReferenceRegistry> {
    require_login(user)?;
    load_registry(ctx, kind).await
}

pub async fn list_registries<U: UserContext>(ctx: &ServiceContext, user: &U) -> EdcResult<Vec<ReferenceRegistry>> {
    require_login(user)?;
    load_registries(ctx).await
}

/// The marché field a registry feeds
fn field_of(marche: &mut Marche, kind: RegistryKind) -> &mut String {
    match kind {
        RegistryKind::Functions => &mut marche.fonction,
        RegistryKind::AoTypes => &mut marche.type_ao,
        RegistryKind::PrestationTypes => &mut marche.type_prestation,
    }
}

fn uses(marche: &Marche, kind: RegistryKind, value: &str) -> bool {
    let current = match kind {
        RegistryKind::Functions => &marche.fonction,
        RegistryKind::AoTypes => &marche.type_ao,
        RegistryKind::PrestationTypes => &marche.type_prestation,
    };
    current.trim().eq_ignore_ascii_case(value.trim())
}

pub struct ReferenceDataService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> ReferenceDataService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn add(self, kind: RegistryKind, value: &str) -> ServiceResult<ReferenceRegistry> {
        self.perform_add(kind, value).await.into()
    }

    pub async fn rename(self, kind: RegistryKind, from: &str, to: &str) -> ServiceResult<ReferenceRegistry> {
        self.perform_rename(kind, from, to).await.into()
    }

    pub async fn remove(self, kind: RegistryKind, value: &str) -> ServiceResult<ReferenceRegistry> {
        self.perform_remove(kind, value).await.into()
    }

    async fn perform_add(&self, kind: RegistryKind, value: &str) -> EdcResult<ReferenceRegistry> {
        ReferenceValueContract::new(self.user).check(value)?;

        let mut registry = load_registry(self.ctx, kind).await?;
        registry.add(value)?;
        self.ctx.registries.save(&registry).await?;
        self.ctx.audit.log(
            self.user,
            AuditModule::ReferenceData,
            "add",
            format!("{}: {}", kind.as_str(), value.trim()),
        );
        Ok(registry)
    }

    async fn perform_rename(&self, kind: RegistryKind, from: &str, to: &str) -> EdcResult<ReferenceRegistry> {
        ReferenceValueContract::new(self.user).check(to)?;

        let mut registry = load_registry(self.ctx, kind).await?;
        registry.rename(from, to)?;
        self.ctx.registries.save(&registry).await?;

        let mut rewritten = 0;
        for mut marche in self.ctx.marches.filter(|m| uses(m, kind, from)).await? {
            *field_of(&mut marche, kind) = to.trim().to_string();
            marche.touch();
            self.ctx.marches.save(&marche).await?;
            rewritten += 1;
        }

        self.ctx.audit.log(
            self.user,
            AuditModule::ReferenceData,
            "rename",
            format!(
                "{}: {} -> {} ({} marché(s) updated)",
                kind.as_str(),
                from.trim(),
                to.trim(),
                rewritten
            ),
        );
        Ok(registry)
    }

    async fn perform_remove(&self, kind: RegistryKind, value: &str) -> EdcResult<ReferenceRegistry> {
        ReferenceValueContract::new(self.user).check(value)?;

        let in_use = self
            .ctx
            .marches
            .filter(|m| !m.is_deleted() && uses(m, kind, value))
            .await?
            .len();
        if in_use > 0 {
            return Err(EdcError::conflict(format!(
                "'{}' is still used by {} marché(s)",
                value.trim(),
                in_use
            )));
        }

        let mut registry = load_registry(self.ctx, kind).await?;
        registry.remove(value)?;
        self.ctx.registries.save(&registry).await?;
        self.ctx.audit.log(
            self.user,
            AuditModule::ReferenceData,
            "remove",
            format!("{}: {}", kind.as_str(), value.trim()),
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::*;
    use edc_models::Role;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_defaults_until_edited() {
        let ctx = context();
        let registries = load_registries(&ctx).await.unwrap();
        assert_eq!(registries.len(), 3);
        assert!(registries[1].contains("AONO"));
        assert!(ctx.registries.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_persists() {
        let ctx = context();
        let root = actor(Role::SuperAdmin);
        ReferenceDataService::new(&ctx, &root)
            .add(RegistryKind::AoTypes, "AMI")
            .await
            .into_result()
            .unwrap();
        let registry = get_registry(&ctx, &root, RegistryKind::AoTypes).await.unwrap();
        assert!(registry.contains("ami"));

        let duplicate = ReferenceDataService::new(&ctx, &root).add(RegistryKind::AoTypes, "AMI").await;
        assert_eq!(duplicate.status_code(), Some(409));
    }

    #[tokio::test]
    async fn test_admin_cannot_edit_registries() {
        let ctx = context();
        let result = ReferenceDataService::new(&ctx, &actor(Role::Admin))
            .add(RegistryKind::Functions, "Commercial")
            .await;
        assert_eq!(result.status_code(), Some(403));
    }

    #[tokio::test]
    async fn test_value_in_use_cannot_be_removed() {
        let ctx = context();
        let mut m = Marche::new(Uuid::new_v4(), "M-1", "Objet");
        m.type_ao = "AONO".into();
        ctx.marches.save(&m).await.unwrap();

        let root = actor(Role::SuperAdmin);
        let result = ReferenceDataService::new(&ctx, &root).remove(RegistryKind::AoTypes, "AONO").await;
        assert_eq!(result.status_code(), Some(409));

        assert!(ReferenceDataService::new(&ctx, &root)
            .remove(RegistryKind::AoTypes, "AONR")
            .await
            .is_success());
    }

    #[tokio::test]
    async fn test_rename_rewrites_marches() {
        let ctx = context();
        let mut m = Marche::new(Uuid::new_v4(), "M-1", "Objet");
        m.type_prestation = "Services".into();
        ctx.marches.save(&m).await.unwrap();

        ReferenceDataService::new(&ctx, &actor(Role::SuperAdmin))
            .rename(RegistryKind::PrestationTypes, "Services", "Services courants")
            .await
            .into_result()
            .unwrap();
        assert_eq!(ctx.marches.get(m.id).await.unwrap().type_prestation, "Services courants");
    }
}
