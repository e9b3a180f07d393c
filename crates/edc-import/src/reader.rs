//! Sheet reader
//!
//! Turns CSV bytes into rows ready to become marchés. Only an unreadable
//! file is an error; bad cells become defaults plus a warning, and rows
//! without a dossier number or object are reported as skipped.

use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder, Trim};
use edc_core::types::FundingSource;
use edc_models::Milestone;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cells::{parse_amount, parse_date, Cell};
use crate::columns::*;
use crate::error::ImportError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A problem tied to one line of the sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    /// 1-based line in the file, header included
    pub line: u64,
    pub message: String,
}

impl RowIssue {
    pub fn new(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// One usable data row
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub line: u64,
    pub numero_dossier: String,
    pub objet: String,
    pub fonction: String,
    pub activite: String,
    pub type_ao: String,
    pub type_prestation: String,
    pub montant_prevu: f64,
    /// `None` falls back to the project's source
    pub source_financement: Option<FundingSource>,
    pub ligne_budgetaire: String,
    pub planned_dates: BTreeMap<Milestone, NaiveDate>,
}

#[derive(Debug, Default)]
pub struct ParsedSheet {
    pub rows: Vec<ImportRow>,
    pub skipped: Vec<RowIssue>,
    pub warnings: Vec<RowIssue>,
}

/// `;` when the header line has more semicolons than commas
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

pub fn parse_sheet(bytes: &[u8]) -> Result<ParsedSheet, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ImportError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(sniff_delimiter(bytes))
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let mut sheet = ParsedSheet::default();
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line());
        let cells: Vec<String> = record
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect();
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        match read_row(line, &cells, &mut sheet.warnings) {
            Some(row) => sheet.rows.push(row),
            None => sheet
                .skipped
                .push(RowIssue::new(line, "missing dossier number or object")),
        }
    }

    tracing::debug!(
        rows = sheet.rows.len(),
        skipped = sheet.skipped.len(),
        warnings = sheet.warnings.len(),
        "sheet parsed"
    );
    Ok(sheet)
}

fn read_row(line: u64, cells: &[String], warnings: &mut Vec<RowIssue>) -> Option<ImportRow> {
    let text = |index: usize| cells.get(index).map(|c| c.trim().to_string()).unwrap_or_default();

    let numero_dossier = text(NUMERO_DOSSIER);
    let objet = text(OBJET);
    if numero_dossier.is_empty() || objet.is_empty() {
        return None;
    }

    let montant_prevu = match parse_amount(&text(MONTANT_PREVU)) {
        Cell::Value(amount) => amount,
        Cell::Blank => 0.0,
        Cell::Invalid => {
            warnings.push(RowIssue::new(
                line,
                format!("unreadable amount '{}', using 0", text(MONTANT_PREVU)),
            ));
            0.0
        }
    };

    let funding = text(SOURCE_FINANCEMENT);
    let source_financement = FundingSource::parse_lenient(&funding);
    if source_financement.is_none() && !funding.is_empty() {
        warnings.push(RowIssue::new(
            line,
            format!("unknown funding source '{}', using the project's", funding),
        ));
    }

    let mut planned_dates = BTreeMap::new();
    for (column, milestone) in milestone_columns() {
        let raw = text(column);
        match parse_date(&raw) {
            Cell::Value(date) => {
                planned_dates.insert(milestone, date);
            }
            Cell::Blank => {}
            Cell::Invalid => warnings.push(RowIssue::new(
                line,
                format!("unreadable date '{}' for {}, left empty", raw, milestone.key()),
            )),
        }
    }

    Some(ImportRow {
        line,
        numero_dossier,
        objet,
        fonction: text(FONCTION),
        activite: text(ACTIVITE),
        type_ao: text(TYPE_AO),
        type_prestation: text(TYPE_PRESTATION),
        montant_prevu,
        source_financement,
        ligne_budgetaire: text(LIGNE_BUDGETAIRE),
        planned_dates,
    })
}
