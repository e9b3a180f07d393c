//! Execution record of a marché
//!
//! Tracks what happens after the contract is signed: the contract itself,
//! delivery documents, payment installments (décomptes), amendments
//! (avenants) and the termination procedure.

use chrono::NaiveDate;
use edc_core::{EdcError, EdcResult};
use serde::{Deserialize, Serialize};

use crate::document::DocumentRef;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub contract: Option<ContractRef>,
    #[serde(default)]
    pub delivery_documents: Vec<DocumentRef>,
    #[serde(default)]
    pub decomptes: Vec<Decompte>,
    #[serde(default)]
    pub avenants: Vec<Avenant>,
    #[serde(default)]
    pub termination: Termination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRef {
    pub numero: String,
    pub titulaire: String,
    pub date_signature: Option<NaiveDate>,
    pub montant: f64,
}

/// Payment installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decompte {
    pub numero: u32,
    pub montant: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub paye: bool,
}

/// Contract amendment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avenant {
    pub numero: u32,
    pub objet: String,
    /// Change to the contract amount (may be negative)
    pub montant_delta: f64,
    pub date: NaiveDate,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TerminationStage {
    #[default]
    None,
    /// Mise en demeure sent to the contractor
    FormalNotice,
    /// Contract terminated (résiliation)
    Terminated,
}

impl TerminationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FormalNotice => "formal_notice",
            Self::Terminated => "terminated",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Termination {
    pub stage: TerminationStage,
    pub formal_notice_date: Option<NaiveDate>,
    pub terminated_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

impl Execution {
    pub fn add_decompte(&mut self, decompte: Decompte) -> EdcResult<()> {
        if self.decomptes.iter().any(|d| d.numero == decompte.numero) {
            return Err(EdcError::conflict(format!(
                "décompte n°{} already exists",
                decompte.numero
            )));
        }
        self.decomptes.push(decompte);
        self.decomptes.sort_by_key(|d| d.numero);
        Ok(())
    }

    pub fn set_decompte_paid(&mut self, numero: u32, paye: bool) -> EdcResult<()> {
        let decompte = self
            .decomptes
            .iter_mut()
            .find(|d| d.numero == numero)
            .ok_or_else(|| EdcError::not_found("Decompte", "numero", numero))?;
        decompte.paye = paye;
        Ok(())
    }

    pub fn remove_decompte(&mut self, numero: u32) -> EdcResult<Decompte> {
        let pos = self
            .decomptes
            .iter()
            .position(|d| d.numero == numero)
            .ok_or_else(|| EdcError::not_found("Decompte", "numero", numero))?;
        Ok(self.decomptes.remove(pos))
    }

    pub fn add_avenant(&mut self, avenant: Avenant) -> EdcResult<()> {
        if self.avenants.iter().any(|a| a.numero == avenant.numero) {
            return Err(EdcError::conflict(format!(
                "avenant n°{} already exists",
                avenant.numero
            )));
        }
        self.avenants.push(avenant);
        self.avenants.sort_by_key(|a| a.numero);
        Ok(())
    }

    pub fn remove_avenant(&mut self, numero: u32) -> EdcResult<Avenant> {
        let pos = self
            .avenants
            .iter()
            .position(|a| a.numero == numero)
            .ok_or_else(|| EdcError::not_found("Avenant", "numero", numero))?;
        Ok(self.avenants.remove(pos))
    }

    /// Move the termination procedure forward
    ///
    /// Skipping the formal notice is allowed; going back or standing still
    /// is not.
    pub fn advance_termination(
        &mut self,
        stage: TerminationStage,
        date: NaiveDate,
        reason: Option<String>,
    ) -> EdcResult<()> {
        let current = self.termination.stage;
        if stage <= current {
            return Err(EdcError::conflict(format!(
                "termination cannot move from {} to {}",
                current.as_str(),
                stage.as_str()
            )));
        }

        match stage {
            TerminationStage::None => {}
            TerminationStage::FormalNotice => self.termination.formal_notice_date = Some(date),
            TerminationStage::Terminated => self.termination.terminated_date = Some(date),
        }
        self.termination.stage = stage;
        if reason.is_some() {
            self.termination.reason = reason;
        }
        Ok(())
    }

    pub fn total_decomptes(&self) -> f64 {
        self.decomptes.iter().map(|d| d.montant).sum()
    }

    pub fn total_paid(&self) -> f64 {
        self.decomptes.iter().filter(|d| d.paye).map(|d| d.montant).sum()
    }

    /// Contract amount including every avenant
    pub fn current_contract_amount(&self) -> Option<f64> {
        let delta: f64 = self.avenants.iter().map(|a| a.montant_delta).sum();
        self.contract.as_ref().map(|c| c.montant + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn decompte(numero: u32, montant: f64) -> Decompte {
        Decompte {
            numero,
            montant,
            date: d(1),
            paye: false,
        }
    }

    #[test]
    fn test_decompte_numbers_are_unique() {
        let mut exec = Execution::default();
        exec.add_decompte(decompte(2, 100.0)).unwrap();
        exec.add_decompte(decompte(1, 50.0)).unwrap();
        let err = exec.add_decompte(decompte(1, 10.0)).unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(exec.decomptes[0].numero, 1);
    }

    #[test]
    fn test_paid_totals() {
        let mut exec = Execution::default();
        exec.add_decompte(decompte(1, 100.0)).unwrap();
        exec.add_decompte(decompte(2, 40.0)).unwrap();
        exec.set_decompte_paid(1, true).unwrap();
        assert_eq!(exec.total_decomptes(), 140.0);
        assert_eq!(exec.total_paid(), 100.0);
        assert!(exec.set_decompte_paid(9, true).is_err());
    }

    #[test]
    fn test_current_contract_amount_includes_avenants() {
        let mut exec = Execution::default();
        assert_eq!(exec.current_contract_amount(), None);
        exec.contract = Some(ContractRef {
            numero: "C-001".into(),
            titulaire: "SOGEA".into(),
            date_signature: Some(d(2)),
            montant: 1000.0,
        });
        exec.add_avenant(Avenant {
            numero: 1,
            objet: "Travaux supplémentaires".into(),
            montant_delta: 150.0,
            date: d(3),
        })
        .unwrap();
        assert_eq!(exec.current_contract_amount(), Some(1150.0));
        assert!(exec.remove_avenant(1).is_ok());
        assert!(exec.remove_avenant(1).is_err());
    }

    #[test]
    fn test_termination_only_moves_forward() {
        let mut exec = Execution::default();
        exec.advance_termination(TerminationStage::FormalNotice, d(5), Some("retard".into()))
            .unwrap();
        assert!(exec
            .advance_termination(TerminationStage::FormalNotice, d(6), None)
            .is_err());
        exec.advance_termination(TerminationStage::Terminated, d(20), None)
            .unwrap();
        assert_eq!(exec.termination.stage, TerminationStage::Terminated);
        assert_eq!(exec.termination.formal_notice_date, Some(d(5)));
        assert_eq!(exec.termination.reason.as_deref(), Some("retard"));
        assert!(exec
            .advance_termination(TerminationStage::None, d(21), None)
            .is_err());
    }
}
