//! CLI command handlers for import
//!
//! CSV files are parsed, previewed and then committed with duplicate
//! checking. Full JSON/YAML exports restore the whole ledger.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::export::{import_from_json, import_from_yaml};
use crate::services::{import_csv, ImportFormat, ImportService};
use crate::storage::Storage;

/// Rows shown in the preview before committing
const PREVIEW_ROWS: usize = 5;

/// Import subcommands
#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Import expenses from a CSV file
    Csv {
        /// Path to the CSV file
        file: PathBuf,

        /// Column layout (long or wide); detected from the header if omitted
        #[arg(short, long)]
        format: Option<String>,

        /// Parse and preview without saving anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Restore the ledger from a JSON or YAML full export
    Restore {
        /// Path to the export file (.json, .yaml or .yml)
        file: PathBuf,

        /// Replace a ledger that already holds data
        #[arg(long)]
        force: bool,
    },
}

/// Handle import commands
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ImportCommands,
) -> TrackerResult<()> {
    match cmd {
        ImportCommands::Csv {
            file,
            format,
            dry_run,
        } => handle_csv_import(storage, settings, &file, format.as_deref(), dry_run),
        ImportCommands::Restore { file, force } => handle_restore(storage, &file, force),
    }
}

fn handle_csv_import(
    storage: &Storage,
    settings: &Settings,
    path: &Path,
    format: Option<&str>,
    dry_run: bool,
) -> TrackerResult<()> {
    let format = format.map(str::parse::<ImportFormat>).transpose()?;
    let file = File::open(path).map_err(|e| {
        TrackerError::Import(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let parsed = import_csv(file, format)?;

    let layout = match parsed.format {
        Some(ImportFormat::Wide) => "wide",
        Some(ImportFormat::Long) => "long",
        None => "unknown",
    };
    println!("Import Preview for '{}' ({} layout)", path.display(), layout);
    println!("{}", "=".repeat(40));
    println!("  Parsed expenses: {}", parsed.records.len());
    println!("  Rows with errors: {}", parsed.errors.len());
    for error in &parsed.errors {
        println!("    Line {}: {}", error.line, error.message);
    }
    println!();

    if parsed.records.is_empty() {
        println!("No expenses to import.");
        return Ok(());
    }

    for record in parsed.records.iter().take(PREVIEW_ROWS) {
        println!(
            "  {} {:<10} {:>12} {}",
            record.date,
            record.category.label(),
            settings.money(record.amount),
            record.note_or_empty()
        );
    }
    if parsed.records.len() > PREVIEW_ROWS {
        println!("  ... and {} more", parsed.records.len() - PREVIEW_ROWS);
    }
    println!();

    if dry_run {
        println!("Dry run: nothing was saved.");
        return Ok(());
    }

    let result = ImportService::new(storage).commit(parsed.records)?;

    println!("Import Complete!");
    println!("  Imported:  {}", result.imported);
    println!("  Skipped:   {} (duplicates)", result.duplicates_skipped);

    Ok(())
}

fn handle_restore(storage: &Storage, path: &Path, force: bool) -> TrackerResult<()> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        TrackerError::Import(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let ledger = match extension.as_deref() {
        Some("json") => import_from_json(&contents)?,
        Some("yaml") | Some("yml") => import_from_yaml(&contents)?,
        _ => {
            return Err(TrackerError::Import(format!(
                "Cannot tell the format of {} (expected .json, .yaml or .yml)",
                path.display()
            )))
        }
    };

    let restored = ImportService::new(storage).restore(ledger, force)?;
    println!("Restored {} expenses from: {}", restored, path.display());

    Ok(())
}
