//! Milestone catalogue
//!
//! The procurement pipeline is a fixed ordered list of milestones ("jalons"),
//! each belonging to one of five groups. Order matters: status derivation
//! scans it backwards and phase gating compares groups by position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Milestone group (one UI tab per group)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneGroup {
    Ppm,
    Consultation,
    Attribution,
    Contracting,
    Execution,
}

impl MilestoneGroup {
    pub const ALL: [MilestoneGroup; 5] = [
        Self::Ppm,
        Self::Consultation,
        Self::Attribution,
        Self::Contracting,
        Self::Execution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ppm => "ppm",
            Self::Consultation => "consultation",
            Self::Attribution => "attribution",
            Self::Contracting => "contracting",
            Self::Execution => "execution",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ppm => "PPM",
            Self::Consultation => "Consultation",
            Self::Attribution => "Attribution",
            Self::Contracting => "Contracting",
            Self::Execution => "Execution",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }

    /// Milestones of this group, in catalogue order
    pub fn milestones(&self) -> impl Iterator<Item = Milestone> + '_ {
        Milestone::ALL.into_iter().filter(move |m| m.group() == *self)
    }
}

impl fmt::Display for MilestoneGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A milestone of the procurement pipeline
///
/// Variant order is catalogue order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    ElaborationDao,
    AvisCipmDao,
    LancementAo,
    Additif,
    OuvertureOffres,
    AnalyseOffres,
    Infructueux,
    PropositionAttribution,
    Recours,
    PublicationResultats,
    Annulation,
    SouscriptionContrat,
    SignatureContrat,
    NotificationContrat,
    DemarragePrestations,
    ReceptionProvisoire,
    ReceptionDefinitive,
}

impl Milestone {
    pub const ALL: [Milestone; 17] = [
        Self::ElaborationDao,
        Self::AvisCipmDao,
        Self::LancementAo,
        Self::Additif,
        Self::OuvertureOffres,
        Self::AnalyseOffres,
        Self::Infructueux,
        Self::PropositionAttribution,
        Self::Recours,
        Self::PublicationResultats,
        Self::Annulation,
        Self::SouscriptionContrat,
        Self::SignatureContrat,
        Self::NotificationContrat,
        Self::DemarragePrestations,
        Self::ReceptionProvisoire,
        Self::ReceptionDefinitive,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::ElaborationDao => "elaboration_dao",
            Self::AvisCipmDao => "avis_cipm_dao",
            Self::LancementAo => "lancement_ao",
            Self::Additif => "additif",
            Self::OuvertureOffres => "ouverture_offres",
            Self::AnalyseOffres => "analyse_offres",
            Self::Infructueux => "infructueux",
            Self::PropositionAttribution => "proposition_attribution",
            Self::Recours => "recours",
            Self::PublicationResultats => "publication_resultats",
            Self::Annulation => "annulation",
            Self::SouscriptionContrat => "souscription_contrat",
            Self::SignatureContrat => "signature_contrat",
            Self::NotificationContrat => "notification_contrat",
            Self::DemarragePrestations => "demarrage_prestations",
            Self::ReceptionProvisoire => "reception_provisoire",
            Self::ReceptionDefinitive => "reception_definitive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ElaborationDao => "Tender file drafted",
            Self::AvisCipmDao => "Tender file reviewed by committee",
            Self::LancementAo => "Call for tenders launched",
            Self::Additif => "Addendum issued",
            Self::OuvertureOffres => "Bids opened",
            Self::AnalyseOffres => "Bids evaluated",
            Self::Infructueux => "Declared unsuccessful",
            Self::PropositionAttribution => "Award proposed",
            Self::Recours => "Appeal filed",
            Self::PublicationResultats => "Results published",
            Self::Annulation => "Procedure cancelled",
            Self::SouscriptionContrat => "Contract drafted",
            Self::SignatureContrat => "Contract signed",
            Self::NotificationContrat => "Contract notified",
            Self::DemarragePrestations => "Works started",
            Self::ReceptionProvisoire => "Provisional acceptance",
            Self::ReceptionDefinitive => "Final acceptance",
        }
    }

    pub fn group(&self) -> MilestoneGroup {
        use Milestone::*;
        match self {
            ElaborationDao | AvisCipmDao => MilestoneGroup::Ppm,
            LancementAo | Additif | OuvertureOffres | AnalyseOffres | Infructueux => {
                MilestoneGroup::Consultation
            }
            PropositionAttribution | Recours | PublicationResultats | Annulation => {
                MilestoneGroup::Attribution
            }
            SouscriptionContrat | SignatureContrat | NotificationContrat => {
                MilestoneGroup::Contracting
            }
            DemarragePrestations | ReceptionProvisoire | ReceptionDefinitive => {
                MilestoneGroup::Execution
            }
        }
    }

    /// Whether the milestone carries a planned date in the PPM
    ///
    /// Event milestones (addendum, appeal, unsuccessful, cancelled) only
    /// ever get a realized date.
    pub fn is_planned(&self) -> bool {
        !matches!(
            self,
            Self::Additif | Self::Infructueux | Self::Recours | Self::Annulation
        )
    }

    /// Planned milestones in catalogue order (the import/export date columns)
    pub fn planned() -> impl Iterator<Item = Milestone> {
        Self::ALL.into_iter().filter(|m| m.is_planned())
    }

    /// Position in the catalogue (0-based)
    pub fn position(&self) -> usize {
        *self as usize
    }

    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_order_matches_positions() {
        for (i, m) in Milestone::ALL.iter().enumerate() {
            assert_eq!(m.position(), i);
        }
    }

    #[test]
    fn test_planned_milestones() {
        let planned: Vec<_> = Milestone::planned().collect();
        assert_eq!(planned.len(), 13);
        assert_eq!(planned.first(), Some(&Milestone::ElaborationDao));
        assert_eq!(planned.last(), Some(&Milestone::ReceptionDefinitive));
        assert!(!planned.contains(&Milestone::Infructueux));
    }

    #[test]
    fn test_event_milestone_groups() {
        assert_eq!(Milestone::Infructueux.group(), MilestoneGroup::Consultation);
        assert_eq!(Milestone::Annulation.group(), MilestoneGroup::Attribution);
    }

    #[test]
    fn test_groups_are_contiguous() {
        let groups: Vec<_> = Milestone::ALL.iter().map(|m| m.group()).collect();
        let mut sorted = groups.clone();
        sorted.sort();
        assert_eq!(groups, sorted);
        assert_eq!(MilestoneGroup::Execution.milestones().count(), 3);
    }

    #[test]
    fn test_parse_and_serde_keys_agree() {
        for m in Milestone::ALL {
            assert_eq!(Milestone::parse(m.key()), Some(m));
            let json = serde_json::to_string(&m).unwrap();
            assert_eq!(json, format!("\"{}\"", m.key()));
        }
        assert_eq!(Milestone::parse("unknown"), None);
        assert_eq!(MilestoneGroup::parse("PPM"), Some(MilestoneGroup::Ppm));
    }
}
