//! YAML Export functionality
//!
//! Exports the complete ledger to YAML for a human-readable backup.

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::export::json::FullExport;
use crate::ledger::Ledger;

/// Export the full ledger to YAML format
pub fn export_full_yaml<W: Write>(ledger: &Ledger, writer: &mut W) -> TrackerResult<()> {
    let export = FullExport::from_ledger(ledger);
    let export_err = |e: std::io::Error| TrackerError::Export(e.to_string());

    writeln!(writer, "# Expense Tracker Full Export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| TrackerError::Export(e.to_string()))?;

    Ok(())
}

/// Parse a YAML export back into a ledger
pub fn import_from_yaml(yaml_str: &str) -> TrackerResult<Ledger> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| TrackerError::Import(e.to_string()))?;
    export.into_ledger()
}
