//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod expense;
pub mod export;
pub mod import;
pub mod report;

pub use budget::{handle_budget_command, BudgetCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use import::{handle_import_command, ImportCommands};
pub use report::{handle_report_command, ReportCommands};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{parse_date, DateRange};

/// Lookback used when no range is given, matching the `last-30` preset
const DEFAULT_RANGE_DAYS: i64 = 30;

/// Date range selection shared by listing and report commands
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub to: Option<String>,

    /// Preset range: last-30, last-90, last-180 or ytd (lookbacks include today)
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    pub preset: Option<String>,
}

impl RangeArgs {
    /// True when the user gave no range at all
    pub fn is_unset(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.preset.is_none()
    }

    /// Resolve to a concrete range relative to `today`
    ///
    /// With neither bound given this is the same range as `--preset last-30`.
    /// A lone `--to` looks back the same distance from that date.
    pub fn resolve(&self, today: NaiveDate) -> TrackerResult<DateRange> {
        if let Some(preset) = &self.preset {
            return DateRange::preset(preset, today);
        }

        let end = match &self.to {
            Some(to) => parse_date(to)?,
            None => today,
        };
        let start = match &self.from {
            Some(from) => parse_date(from)?,
            None => DateRange::last_days(end, DEFAULT_RANGE_DAYS).start,
        };

        Ok(DateRange::new(start, end))
    }
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an optional date argument, defaulting to today
pub fn date_or_today(date: Option<&str>) -> TrackerResult<NaiveDate> {
    date.map(parse_date).transpose().map(|d| d.unwrap_or_else(today))
}

/// Create an output file wrapped in a buffered writer
pub(crate) fn create_output(path: &Path) -> TrackerResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        TrackerError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
