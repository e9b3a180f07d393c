//! Sheet writer
//!
//! Exports use the same columns as imports, so an exported plan imports
//! back unchanged. Output starts with a UTF-8 BOM for spreadsheet apps.

use csv::WriterBuilder;
use edc_models::Marche;

use crate::cells::{format_amount, format_date};
use crate::columns::{header, milestone_columns};
use crate::error::ImportError;

const UTF8_BOM: &str = "\u{feff}";

/// Header row only
pub fn write_template() -> Result<String, ImportError> {
    write_marches(&[])
}

pub fn write_marches(marches: &[Marche]) -> Result<String, ImportError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(header())?;

    for marche in marches {
        let mut record = vec![
            marche.numero_dossier.clone(),
            marche.objet.clone(),
            marche.fonction.clone(),
            marche.activite.clone(),
            marche.type_ao.clone(),
            marche.type_prestation.clone(),
            format_amount(marche.montant_prevu),
            marche.source_financement.as_str().to_string(),
            marche.ligne_budgetaire.clone(),
        ];
        record.extend(milestone_columns().map(|(_, m)| format_date(marche.planned_dates.get(&m))));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::Write(e.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|e| ImportError::Write(e.to_string()))?;
    Ok(format!("{}{}", UTF8_BOM, body))
}
