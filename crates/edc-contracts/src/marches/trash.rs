//! Trash contracts: soft delete, restore and purge

use edc_core::error::ValidationErrors;
use edc_core::traits::{SoftDeletable, UserContext};
use edc_core::types::Capability;
use edc_core::EdcResult;
use edc_models::Marche;

use crate::base::{require_capability, Contract, ValidationResult};

/// Move a live marché to the trash
pub struct DeleteMarcheContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> DeleteMarcheContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Marche> for DeleteMarcheContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::Write, "delete marchés")
    }

    fn validate(&self, marche: &Marche) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if marche.is_deleted() {
            errors.add_base("Marché is already in the trash");
        }
        errors.into_result()
    }

    fn is_writable(&self, _attribute: &str) -> bool {
        false
    }
}

/// Bring a marché back from the trash
pub struct RestoreMarcheContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> RestoreMarcheContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Marche> for RestoreMarcheContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::Write, "restore marchés")
    }

    fn validate(&self, marche: &Marche) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if !marche.is_deleted() {
            errors.add_base("Marché is not in the trash");
        }
        errors.into_result()
    }

    fn is_writable(&self, _attribute: &str) -> bool {
        false
    }
}

/// Remove a trashed marché for good
pub struct PurgeMarcheContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> PurgeMarcheContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Marche> for PurgeMarcheContract<'a, U> {
    fn authorize(&self) -> EdcResult<()> {
        require_capability(self.user, Capability::ConfigureSystem, "empty the trash")
    }

    fn validate(&self, marche: &Marche) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if !marche.is_deleted() {
            errors.add_base("Only marchés in the trash can be purged");
        }
        errors.into_result()
    }

    fn is_writable(&self, _attribute: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::MockUser;
    use uuid::Uuid;

    fn marche() -> Marche {
        Marche::new(Uuid::new_v4(), "1/2024", "Travaux")
    }

    #[test]
    fn test_delete_then_restore() {
        let user = MockUser::with(&[Capability::Write]);
        let mut m = marche();
        assert!(DeleteMarcheContract::new(&user).check(&m).is_ok());
        assert!(RestoreMarcheContract::new(&user).check(&m).is_err());

        m.soft_delete("Mock");
        assert!(DeleteMarcheContract::new(&user).check(&m).is_err());
        assert!(RestoreMarcheContract::new(&user).check(&m).is_ok());
    }

    #[test]
    fn test_purge_requires_configure_system() {
        let mut m = marche();
        m.soft_delete("Mock");

        let agent = MockUser::with(&[Capability::Write]);
        assert_eq!(
            PurgeMarcheContract::new(&agent).check(&m).unwrap_err().status_code(),
            403
        );
        let admin = MockUser::all();
        assert!(PurgeMarcheContract::new(&admin).check(&m).is_ok());
    }

    #[test]
    fn test_live_marche_cannot_be_purged() {
        let admin = MockUser::all();
        assert!(PurgeMarcheContract::new(&admin).check(&marche()).is_err());
    }
}
