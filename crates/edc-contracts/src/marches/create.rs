//! Create contract for marchés

use edc_core::traits::UserContext;
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::{Marche, ReferenceRegistry};

use super::base::MarcheBaseContract;
use crate::base::{require_capability, Contract, ValidationResult};

pub struct CreateMarcheContract<'a, U: UserContext> {
    base: MarcheBaseContract<'a>,
    user: &'a U,
}

impl<'a, U: UserContext> CreateMarcheContract<'a, U> {
    pub fn new(user: &'a U, registries: Option<&'a [ReferenceRegistry]>) -> Self {
        Self {
            base: MarcheBaseContract::new(registries),
            user,
        }
    }
}

impl<'a, U: UserContext> Contract<Marche> for CreateMarcheContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::Write, "register marchés")
    }

    fn validate(&self, marche: &Marche) -> ValidationResult {
        self.base.validate(marche)
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(
            attribute,
            "project_id"
                | "numero_dossier"
                | "objet"
                | "fonction"
                | "activite"
                | "type_ao"
                | "type_prestation"
                | "montant_prevu"
                | "source_financement"
                | "ligne_budgetaire"
                | "planned_dates"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::MockUser;
    use uuid::Uuid;

    #[test]
    fn test_agent_can_create() {
        let user = MockUser::with(&[Capability::Write, Capability::Download, Capability::Import]);
        let contract = CreateMarcheContract::new(&user, None);
        let marche = Marche::new(Uuid::new_v4(), "1/2024", "Travaux");
        assert!(contract.check(&marche).is_ok());
        assert!(contract.is_writable("planned_dates"));
        assert!(!contract.is_writable("realized_dates"));
    }

    #[test]
    fn test_viewer_cannot_create() {
        let user = MockUser::with(&[Capability::Download]);
        let contract = CreateMarcheContract::new(&user, None);
        let marche = Marche::new(Uuid::new_v4(), "1/2024", "Travaux");
        assert_eq!(contract.check(&marche).unwrap_err().status_code(), 403);
    }
}
