//! Status derivation and lateness
//!
//! Status is computed from flags and realized dates on every read and is
//! never persisted.

use chrono::NaiveDate;
use edc_core::StatusCategory;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::marche::MarcheFlags;
use crate::milestone::Milestone;

pub const STATUS_CANCELLED: &str = "Cancelled";
pub const STATUS_UNSUCCESSFUL: &str = "Unsuccessful";
pub const STATUS_REGISTERED: &str = "Registered in plan";

/// Derived status of a marché
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub label: &'static str,
    pub category: StatusCategory,
    /// Last milestone reached, when the label comes from one
    pub milestone: Option<Milestone>,
}

pub fn derive_status(
    flags: &MarcheFlags,
    realized: &BTreeMap<Milestone, NaiveDate>,
) -> StatusReport {
    if flags.is_annule {
        return StatusReport {
            label: STATUS_CANCELLED,
            category: StatusCategory::Warning,
            milestone: None,
        };
    }
    if flags.is_infructueux {
        return StatusReport {
            label: STATUS_UNSUCCESSFUL,
            category: StatusCategory::Warning,
            milestone: None,
        };
    }

    match Milestone::ALL
        .iter()
        .rev()
        .find(|m| realized.contains_key(m))
    {
        Some(m) => StatusReport {
            label: m.label(),
            category: StatusCategory::Success,
            milestone: Some(*m),
        },
        None => StatusReport {
            label: STATUS_REGISTERED,
            category: StatusCategory::Neutral,
            milestone: None,
        },
    }
}

/// Lateness of one milestone relative to a reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lateness {
    /// Planned date passed, nothing realized
    Late,
    /// Realized after the planned date
    Delayed,
    OnTime,
    /// Planned in the future, not realized yet
    Pending,
    Unplanned,
}

pub fn lateness(
    planned: Option<NaiveDate>,
    realized: Option<NaiveDate>,
    today: NaiveDate,
) -> Lateness {
    match (planned, realized) {
        (None, _) => Lateness::Unplanned,
        (Some(p), Some(r)) if r > p => Lateness::Delayed,
        (Some(_), Some(_)) => Lateness::OnTime,
        (Some(p), None) if p < today => Lateness::Late,
        (Some(_), None) => Lateness::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_cancelled_wins_over_realized_dates() {
        let mut realized = BTreeMap::new();
        realized.insert(Milestone::SignatureContrat, d(2024, 3, 1));
        let flags = MarcheFlags {
            is_annule: true,
            is_infructueux: true,
            ..Default::default()
        };
        let status = derive_status(&flags, &realized);
        assert_eq!(status.label, STATUS_CANCELLED);
        assert_eq!(status.category, StatusCategory::Warning);
    }

    #[test]
    fn test_unsuccessful() {
        let flags = MarcheFlags {
            is_infructueux: true,
            ..Default::default()
        };
        assert_eq!(derive_status(&flags, &BTreeMap::new()).label, STATUS_UNSUCCESSFUL);
    }

    #[test]
    fn test_registered_in_plan_by_default() {
        let status = derive_status(&MarcheFlags::default(), &BTreeMap::new());
        assert_eq!(status.label, STATUS_REGISTERED);
        assert_eq!(status.category, StatusCategory::Neutral);
        assert_eq!(status.milestone, None);
    }

    #[test]
    fn test_last_milestone_in_catalogue_order_wins() {
        let mut realized = BTreeMap::new();
        // Entered out of order on purpose: catalogue position decides.
        realized.insert(Milestone::OuvertureOffres, d(2024, 1, 1));
        realized.insert(Milestone::ElaborationDao, d(2024, 6, 1));
        let status = derive_status(&MarcheFlags::default(), &realized);
        assert_eq!(status.label, "Bids opened");
        assert_eq!(status.milestone, Some(Milestone::OuvertureOffres));
        assert_eq!(status.category, StatusCategory::Success);
    }

    #[test]
    fn test_lateness_cases() {
        let today = d(2024, 5, 10);
        assert_eq!(lateness(Some(d(2024, 5, 1)), None, today), Lateness::Late);
        assert_eq!(
            lateness(Some(d(2024, 5, 1)), Some(d(2024, 5, 3)), today),
            Lateness::Delayed
        );
        assert_eq!(
            lateness(Some(d(2024, 5, 1)), Some(d(2024, 5, 1)), today),
            Lateness::OnTime
        );
        assert_eq!(lateness(Some(d(2024, 6, 1)), None, today), Lateness::Pending);
        assert_eq!(lateness(Some(today), None, today), Lateness::Pending);
        assert_eq!(lateness(None, Some(today), today), Lateness::Unplanned);
    }
}
