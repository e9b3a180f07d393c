//! Shared service dependencies

use chrono::{NaiveDate, Utc};
use edc_audit::{AuditLogger, DEFAULT_WINDOW};
use edc_core::traits::{Id, UserContext};
use edc_core::types::Capability;
use edc_core::{EdcError, EdcResult};
use edc_models::{dossier_key, LibraryDocument, Marche, Project, ReferenceRegistry, User};
use edc_store::{Repository, SharedStore};

/// Tunables the services need from configuration
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub password_min_length: usize,
    pub audit_window: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            password_min_length: 8,
            audit_window: DEFAULT_WINDOW,
        }
    }
}

/// Repositories, audit logger and settings, cloned into every request
#[derive(Clone)]
pub struct ServiceContext {
    store: SharedStore,
    pub projects: Repository<Project>,
    pub marches: Repository<Marche>,
    pub users: Repository<User>,
    pub library: Repository<LibraryDocument>,
    pub registries: Repository<ReferenceRegistry>,
    pub audit: AuditLogger,
    pub settings: ServiceSettings,
}

impl ServiceContext {
    pub fn new(store: SharedStore, settings: ServiceSettings) -> Self {
        Self {
            projects: Repository::new(store.clone()),
            marches: Repository::new(store.clone()),
            users: Repository::new(store.clone()),
            library: Repository::new(store.clone()),
            registries: Repository::new(store.clone()),
            audit: AuditLogger::with_window(store.clone(), settings.audit_window),
            store,
            settings,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Reference day for lateness
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Dossier numbers are unique among every stored marché, trashed ones included
    pub async fn ensure_dossier_available(&self, numero: &str, except: Option<Id>) -> EdcResult<()> {
        let numero = numero.trim();
        let key = dossier_key(numero);
        let taken = self
            .marches
            .all()
            .await?
            .iter()
            .any(|m| Some(m.id) != except && dossier_key(&m.numero_dossier) == key);
        if taken {
            return Err(EdcError::conflict(format!(
                "dossier number '{}' is already used",
                numero
            )));
        }
        Ok(())
    }
}

/// Reads need a signed-in user
pub fn require_login<U: UserContext + ?Sized>(user: &U) -> EdcResult<()> {
    if user.is_logged_in() {
        Ok(())
    } else {
        Err(EdcError::unauthorized("You need to sign in"))
    }
}

/// Payloads are only served to readers allowed to download them
pub fn can_read_payloads<U: UserContext + ?Sized>(user: &U) -> bool {
    user.allowed(Capability::Download)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use edc_auth::CurrentUser;
    use edc_models::Role;
    use edc_store::MemoryStore;
    use std::sync::Arc;
    use uuid::Uuid;

    pub fn context() -> ServiceContext {
        ServiceContext::new(Arc::new(MemoryStore::new()), ServiceSettings::default())
    }

    pub fn actor(role: Role) -> CurrentUser {
        CurrentUser::new(Uuid::new_v4(), format!("{} user", role.as_str()), "actor@edc.cm", role)
    }

    /// Let spawned audit writes land
    pub async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use edc_auth::CurrentUser;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_dossier_uniqueness_is_case_insensitive() {
        let ctx = context();
        let marche = Marche::new(Uuid::new_v4(), "DAO-01/2024", "Objet");
        ctx.marches.save(&marche).await.unwrap();

        let err = ctx.ensure_dossier_available(" dao-01/2024", None).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert!(ctx.ensure_dossier_available("DAO-01/2024", Some(marche.id)).await.is_ok());
        assert!(ctx.ensure_dossier_available("DAO-02/2024", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_dossier_uniqueness_folds_accents() {
        let ctx = context();
        ctx.marches.save(&Marche::new(Uuid::new_v4(), "É-1", "Objet")).await.unwrap();
        let err = ctx.ensure_dossier_available("é-1", None).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_require_login() {
        assert!(require_login(&CurrentUser::anonymous()).is_err());
        assert!(require_login(&CurrentUser::system()).is_ok());
    }
}
