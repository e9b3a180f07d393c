//! Supporting documents of a marché
//!
//! Documents are held inline as `data:` URIs, one per slot. Slots are
//! usually milestone keys.

use edc_contracts::marches::UpdateMarcheContract;
use edc_contracts::{require_capability, Contract};
use edc_core::traits::{Id, UserContext};
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::{AuditModule, DocumentRef, Marche};

use crate::context::ServiceContext;
use crate::result::ServiceResult;

pub struct DocumentService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> DocumentService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    /// Store `content` (a `data:` URI or bare base64) under `slot`, replacing any previous file
    pub async fn attach(self, id: Id, slot: &str, file_name: &str, content: &str) -> ServiceResult<Marche> {
        self.perform_attach(id, slot, file_name, content).await.into()
    }

    pub async fn remove(self, id: Id, slot: &str) -> ServiceResult<Marche> {
        self.perform_remove(id, slot).await.into()
    }

    /// Fetch a document payload; needs the download capability
    pub async fn download(self, id: Id, slot: &str) -> EdcResult<DocumentRef> {
        require_capability(self.user, Capability::Download, "download documents")?;
        let marche = self.ctx.marches.get(id).await?;
        marche
            .documents
            .get(slot)
            .cloned()
            .ok_or_else(|| edc_core::EdcError::not_found("Document", "slot", slot))
    }

    async fn perform_attach(&self, id: Id, slot: &str, file_name: &str, content: &str) -> EdcResult<Marche> {
        let contract = UpdateMarcheContract::new(self.user, None);
        contract.authorize()?;

        let mut marche = self.ctx.marches.get(id).await?;
        contract.check(&marche)?;
        let document = DocumentRef::from_data_uri(file_name, content, self.user.display_name())?;
        let detail = format!("{}: {} -> {}", marche.numero_dossier, document.file_name, slot.trim());
        marche.set_document(slot, document)?;

        self.ctx.marches.save(&marche).await?;
        self.ctx
            .audit
            .log(self.user, AuditModule::Documents, "attach", detail);
        Ok(marche)
    }

    async fn perform_remove(&self, id: Id, slot: &str) -> EdcResult<Marche> {
        let contract = UpdateMarcheContract::new(self.user, None);
        contract.authorize()?;

        let mut marche = self.ctx.marches.get(id).await?;
        contract.check(&marche)?;
        let removed = marche.remove_document(slot)?;

        self.ctx.marches.save(&marche).await?;
        self.ctx.audit.log(
            self.user,
            AuditModule::Documents,
            "remove",
            format!("{}: {}", marche.numero_dossier, removed.file_name),
        );
        Ok(marche)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::*;
    use edc_models::Role;
    use uuid::Uuid;

    async fn seeded(ctx: &ServiceContext) -> Marche {
        let m = Marche::new(Uuid::new_v4(), "M-1", "Objet");
        ctx.marches.save(&m).await.unwrap();
        m
    }

    #[tokio::test]
    async fn test_attach_download_remove() {
        let ctx = context();
        let m = seeded(&ctx).await;
        let agent = actor(Role::Agent);

        let updated = DocumentService::new(&ctx, &agent)
            .attach(m.id, "lancement_ao", "avis.txt", "aGVsbG8=")
            .await
            .into_result()
            .unwrap();
        assert_eq!(updated.documents["lancement_ao"].mime_type, "text/plain");

        let doc = DocumentService::new(&ctx, &actor(Role::Viewer))
            .download(m.id, "lancement_ao")
            .await
            .unwrap();
        assert_eq!(doc.decode().unwrap(), b"hello");

        assert!(DocumentService::new(&ctx, &agent)
            .remove(m.id, "lancement_ao")
            .await
            .is_success());
        let missing = DocumentService::new(&ctx, &agent).remove(m.id, "lancement_ao").await;
        assert_eq!(missing.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_guest_cannot_download() {
        let ctx = context();
        let m = seeded(&ctx).await;
        let err = DocumentService::new(&ctx, &actor(Role::Guest))
            .download(m.id, "x")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_bad_payload_is_rejected() {
        let ctx = context();
        let m = seeded(&ctx).await;
        let result = DocumentService::new(&ctx, &actor(Role::Agent))
            .attach(m.id, "x", "a.pdf", "%%% not base64 %%%")
            .await;
        assert_eq!(result.status_code(), Some(422));
    }
}
