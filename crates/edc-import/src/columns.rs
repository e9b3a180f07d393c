//! Sheet layout

use edc_models::Milestone;

pub const NUMERO_DOSSIER: usize = 0;
pub const OBJET: usize = 1;
pub const FONCTION: usize = 2;
pub const ACTIVITE: usize = 3;
pub const TYPE_AO: usize = 4;
pub const TYPE_PRESTATION: usize = 5;
pub const MONTANT_PREVU: usize = 6;
pub const SOURCE_FINANCEMENT: usize = 7;
pub const LIGNE_BUDGETAIRE: usize = 8;

/// Columns before the first milestone date
pub const FIXED_COLUMNS: usize = 9;

const FIXED_HEADERS: [&str; FIXED_COLUMNS] = [
    "Dossier number",
    "Object",
    "Analytic function",
    "Activity",
    "AO type",
    "Prestation type",
    "Planned amount",
    "Funding source",
    "Budget line",
];

/// Planned milestones paired with their 0-based column
pub fn milestone_columns() -> impl Iterator<Item = (usize, Milestone)> {
    Milestone::planned()
        .enumerate()
        .map(|(i, m)| (FIXED_COLUMNS + i, m))
}

pub fn header() -> Vec<String> {
    FIXED_HEADERS
        .iter()
        .map(|h| h.to_string())
        .chain(Milestone::planned().map(|m| format!("{} (planned)", m.label())))
        .collect()
}

pub fn column_count() -> usize {
    FIXED_COLUMNS + Milestone::planned().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = header();
        assert_eq!(header.len(), column_count());
        assert_eq!(header[NUMERO_DOSSIER], "Dossier number");
        assert_eq!(header[MONTANT_PREVU], "Planned amount");
        assert_eq!(header[FIXED_COLUMNS], "Tender file drafted (planned)");
    }

    #[test]
    fn test_event_milestones_have_no_column() {
        assert!(milestone_columns().all(|(_, m)| m.is_planned()));
        assert!(!milestone_columns().any(|(_, m)| m == Milestone::Recours));
        assert_eq!(milestone_columns().count(), 13);
    }
}
