//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use super::create_output;
use crate::error::{TrackerError, TrackerResult};
use crate::export::{
    export_budgets_csv, export_expenses_csv, export_full_json, export_full_yaml, FullExport,
};
use crate::ledger::Ledger;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (expenses only)
    Csv,
    /// JSON format (full ledger)
    Json,
    /// YAML format (full ledger, human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the whole ledger
    All {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export expenses to CSV, one row per expense
    Expenses {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export weekly budgets with spending to CSV
    Budgets {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show export information without writing files
    Info,
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> TrackerResult<()> {
    let ledger = storage.load_ledger()?;

    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => write_to(output, "Full ledger", |mut w| match format {
            ExportFormat::Csv => export_expenses_csv(&ledger, &mut w),
            ExportFormat::Json => export_full_json(&ledger, &mut w, pretty),
            ExportFormat::Yaml => export_full_yaml(&ledger, &mut w),
        }),
        ExportCommands::Expenses { output } => {
            let label = format!("{} expenses", ledger.len());
            write_to(output, &label, |mut w| export_expenses_csv(&ledger, &mut w))
        }
        ExportCommands::Budgets { output } => {
            let label = format!("{} weekly budgets", ledger.weekly_budgets().count());
            write_to(output, &label, |mut w| export_budgets_csv(&ledger, &mut w))
        }
        ExportCommands::Info => {
            print_export_info(&ledger);
            Ok(())
        }
    }
}

/// Run `export` against a file, or stdout when no path is given
fn write_to<F>(output: Option<PathBuf>, label: &str, export: F) -> TrackerResult<()>
where
    F: FnOnce(&mut dyn Write) -> TrackerResult<()>,
{
    let flush_err = |e: io::Error| TrackerError::Export(e.to_string());

    match output {
        Some(path) => {
            let mut writer = create_output(&path)?;
            export(&mut writer)?;
            writer.flush().map_err(flush_err)?;
            println!("{} exported to: {}", label, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            export(&mut lock)?;
            lock.flush().map_err(flush_err)?;
        }
    }
    Ok(())
}

fn print_export_info(ledger: &Ledger) {
    let export = FullExport::from_ledger(ledger);

    println!("Export Information");
    println!("==================\n");

    println!("Schema Version: {}", export.schema_version);
    println!("App Version:    {}", export.app_version);
    println!();

    println!("Data Summary:");
    println!("  Expenses:       {}", export.metadata.expense_count);
    println!("  Weekly budgets: {}", export.metadata.weekly_budget_count);
    println!("  Daily budgets:  {}", export.metadata.daily_budget_count);
    println!("  Total spend:    {}", export.metadata.total_spend);
    println!();

    if let (Some(earliest), Some(latest)) = (
        &export.metadata.earliest_expense,
        &export.metadata.latest_expense,
    ) {
        println!("Expense Date Range:");
        println!("  Earliest: {}", earliest);
        println!("  Latest:   {}", latest);
    }
}
