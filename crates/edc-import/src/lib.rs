//! # edc-import
//!
//! CSV import and export of procurement plans.
//!
//! The sheet layout is positional: nine descriptive columns followed by
//! one column per planned milestone in catalogue order. The header row is
//! the template and is never interpreted, so sheets exported with older
//! labels still import.

pub mod cells;
pub mod columns;
pub mod error;
pub mod reader;
pub mod service;
pub mod writer;

pub use error::ImportError;
pub use reader::{parse_sheet, ImportRow, ParsedSheet, RowIssue};
pub use service::{export_template, ExportService, ImportReport, ImportService};
pub use writer::{write_marches, write_template};
