//! Export module for the expense tracker
//!
//! - CSV: expense records and weekly budgets (spreadsheet-compatible)
//! - JSON: machine-readable full export, restorable
//! - YAML: human-readable full export, restorable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_budgets_csv, export_expenses_csv};
pub use json::{export_full_json, import_from_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
