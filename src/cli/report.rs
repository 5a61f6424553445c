//! CLI commands for reports
//!
//! Provides commands for generating and exporting spending reports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use super::{create_output, today, RangeArgs};
use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::reports::{
    AnomalyReport, CategoryReport, Granularity, PatternReport, PeriodReport, SummaryReport,
    TimelineReport,
};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Totals, averages, budget usage and comparison with the previous period
    Summary {
        #[command(flatten)]
        range: RangeArgs,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spending broken down by category
    #[command(alias = "category")]
    Categories {
        #[command(flatten)]
        range: RangeArgs,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Week-by-week spending against budgets
    Weekly {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Month-by-month spending
    Monthly {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Day-of-week patterns and insights
    #[command(alias = "insights")]
    Patterns {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Daily totals with running total and 7-day average
    Timeline {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Days with unusually high spending (every recorded day unless a range is given)
    Anomalies {
        #[command(flatten)]
        range: RangeArgs,

        /// Standard deviations above the mean (defaults to the configured value)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> TrackerResult<()> {
    let ledger = storage.load_ledger()?;

    match cmd {
        ReportCommands::Summary { range, output } => {
            let report = SummaryReport::generate(&ledger, range.resolve(today())?)?;
            write_or_print(output, &report.format_terminal(), |w| report.export_csv(w))
        }

        ReportCommands::Categories { range, output } => {
            let report = CategoryReport::generate(&ledger, range.resolve(today())?);
            write_or_print(output, &report.format_terminal(), |w| report.export_csv(w))
        }

        ReportCommands::Weekly { range } => {
            let report =
                PeriodReport::generate(&ledger, range.resolve(today())?, Granularity::Weekly)?;
            print!("{}", report.format_terminal());
            Ok(())
        }

        ReportCommands::Monthly { range } => {
            let report =
                PeriodReport::generate(&ledger, range.resolve(today())?, Granularity::Monthly)?;
            print!("{}", report.format_terminal());
            Ok(())
        }

        ReportCommands::Patterns { range } => {
            let report = PatternReport::generate(&ledger, range.resolve(today())?);
            print!("{}", report.format_terminal());
            Ok(())
        }

        ReportCommands::Timeline { range } => {
            let report = TimelineReport::generate(&ledger, range.resolve(today())?);
            print!("{}", report.format_terminal());
            Ok(())
        }

        ReportCommands::Anomalies {
            range,
            threshold,
            output,
        } => {
            let window = if range.is_unset() {
                None
            } else {
                Some(range.resolve(today())?)
            };
            let threshold = threshold.unwrap_or(settings.anomaly_threshold);
            let report = AnomalyReport::generate(&ledger, window, threshold)?;
            write_or_print(output, &report.format_terminal(), |w| report.export_csv(w))
        }
    }
}

/// Export to `output` when given, otherwise print the terminal rendering
fn write_or_print<F>(output: Option<PathBuf>, terminal: &str, export: F) -> TrackerResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> TrackerResult<()>,
{
    match output {
        Some(path) => {
            let mut writer = create_output(&path)?;
            export(&mut writer)?;
            writer
                .flush()
                .map_err(|e| TrackerError::Export(e.to_string()))?;
            println!("Report exported to: {}", path.display());
        }
        None => print!("{}", terminal),
    }
    Ok(())
}
