//! Phase accessibility gating
//!
//! Once a procedure is declared unsuccessful or cancelled, the groups after
//! the one holding that event milestone are closed.

use crate::marche::MarcheFlags;
use crate::milestone::{Milestone, MilestoneGroup};

/// Last accessible group for the given flags, `None` when nothing is closed
///
/// With both flags set the earlier (stricter) limit applies.
pub fn phase_limit(flags: &MarcheFlags) -> Option<MilestoneGroup> {
    let unsuccessful = flags.is_infructueux.then(|| Milestone::Infructueux.group());
    let cancelled = flags.is_annule.then(|| Milestone::Annulation.group());

    match (unsuccessful, cancelled) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

pub fn is_phase_accessible(group: MilestoneGroup, flags: &MarcheFlags) -> bool {
    phase_limit(flags).map_or(true, |limit| group <= limit)
}

pub fn accessible_groups(flags: &MarcheFlags) -> Vec<MilestoneGroup> {
    MilestoneGroup::ALL
        .into_iter()
        .filter(|g| is_phase_accessible(*g, flags))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(infructueux: bool, annule: bool) -> MarcheFlags {
        MarcheFlags {
            is_infructueux: infructueux,
            is_annule: annule,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_flags_opens_everything() {
        assert_eq!(accessible_groups(&flags(false, false)).len(), 5);
        assert_eq!(phase_limit(&flags(false, false)), None);
    }

    #[test]
    fn test_unsuccessful_closes_groups_after_consultation() {
        let f = flags(true, false);
        assert!(is_phase_accessible(MilestoneGroup::Ppm, &f));
        assert!(is_phase_accessible(MilestoneGroup::Consultation, &f));
        for group in [
            MilestoneGroup::Attribution,
            MilestoneGroup::Contracting,
            MilestoneGroup::Execution,
        ] {
            assert!(!is_phase_accessible(group, &f));
        }
    }

    #[test]
    fn test_cancelled_keeps_attribution() {
        let f = flags(false, true);
        assert!(is_phase_accessible(MilestoneGroup::Attribution, &f));
        assert!(!is_phase_accessible(MilestoneGroup::Contracting, &f));
    }

    #[test]
    fn test_both_flags_use_stricter_limit() {
        assert_eq!(
            phase_limit(&flags(true, true)),
            Some(MilestoneGroup::Consultation)
        );
    }
}
