//! Delete Service for Projects
//!
//! A project that still owns live marchés cannot be deleted. Marchés of
//! the project sitting in the trash are purged with it.

use edc_contracts::projects::DeleteProjectContract;
use edc_contracts::Contract;
use edc_core::traits::{Id, SoftDeletable, UserContext};
use edc_core::{EdcError, EdcResult};
use edc_models::{AuditModule, Project};

use crate::context::ServiceContext;
use crate::result::ServiceResult;

pub struct DeleteProjectService<'a, U: UserContext> {
    ctx: &'a ServiceContext,
    user: &'a U,
}

impl<'a, U: UserContext> DeleteProjectService<'a, U> {
    pub fn new(ctx: &'a ServiceContext, user: &'a U) -> Self {
        Self { ctx, user }
    }

    pub async fn call(self, id: Id) -> ServiceResult<Project> {
        self.perform(id).await.into()
    }

    async fn perform(&self, id: Id) -> EdcResult<Project> {
        let project = self.ctx.projects.get(id).await?;
        DeleteProjectContract::new(self.user).check(&project)?;

        let owned = self.ctx.marches.filter(|m| m.project_id == id).await?;
        let live = owned.iter().filter(|m| !m.is_deleted()).count();
        if live > 0 {
            return Err(EdcError::conflict(format!(
                "project '{}' still has {} marché(s)",
                project.name, live
            )));
        }

        for trashed in &owned {
            self.ctx.marches.delete(trashed.id).await?;
        }
        self.ctx.projects.delete(id).await?;

        tracing::info!(project_id = %id, purged = owned.len(), "project deleted");
        self.ctx
            .audit
            .log(self.user, AuditModule::Projects, "delete", project.name.clone());
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::*;
    use edc_models::{Marche, Role};

    #[tokio::test]
    async fn test_project_with_live_marches_is_kept() {
        let ctx = context();
        let project = Project::new("PPM", 2025);
        ctx.projects.save(&project).await.unwrap();
        ctx.marches.save(&Marche::new(project.id, "M-1", "Objet")).await.unwrap();

        let result = DeleteProjectService::new(&ctx, &actor(Role::Agent)).call(project.id).await;
        assert_eq!(result.status_code(), Some(409));
        assert!(ctx.projects.find(project.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_purges_trashed_marches() {
        let ctx = context();
        let project = Project::new("PPM", 2025);
        ctx.projects.save(&project).await.unwrap();
        let mut trashed = Marche::new(project.id, "M-1", "Objet");
        trashed.soft_delete("agent");
        ctx.marches.save(&trashed).await.unwrap();

        let result = DeleteProjectService::new(&ctx, &actor(Role::Agent)).call(project.id).await;
        assert!(result.is_success());
        assert!(ctx.projects.find(project.id).await.unwrap().is_none());
        assert!(ctx.marches.find(trashed.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_viewer_cannot_delete() {
        let ctx = context();
        let project = Project::new("PPM", 2025);
        ctx.projects.save(&project).await.unwrap();
        let result = DeleteProjectService::new(&ctx, &actor(Role::Viewer)).call(project.id).await;
        assert_eq!(result.status_code(), Some(403));
    }
}
