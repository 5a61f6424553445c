//! JSON Export functionality
//!
//! Exports the complete ledger to JSON format with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::ledger::Ledger;
use crate::models::{DailyBudget, ExpenseRecord, Money, WeeklyBudget};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub expenses: Vec<ExpenseRecord>,

    pub weekly_budgets: Vec<WeeklyBudget>,

    pub daily_budgets: Vec<DailyBudget>,

    pub metadata: ExportMetadata,
}

/// Summary figures included for reference; ignored on restore
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub expense_count: usize,

    pub weekly_budget_count: usize,

    pub daily_budget_count: usize,

    pub total_spend: Money,

    /// Earliest expense date
    pub earliest_expense: Option<String>,

    /// Latest expense date
    pub latest_expense: Option<String>,
}

impl FullExport {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let observed = ledger.observed_range();
        let metadata = ExportMetadata {
            expense_count: ledger.len(),
            weekly_budget_count: ledger.weekly_budgets().count(),
            daily_budget_count: ledger.daily_budgets().count(),
            total_spend: ledger.expenses().iter().map(|r| r.amount).sum(),
            earliest_expense: observed.map(|r| r.start.to_string()),
            latest_expense: observed.map(|r| r.end.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            expenses: ledger.expenses().to_vec(),
            weekly_budgets: ledger.weekly_budgets().cloned().collect(),
            daily_budgets: ledger.daily_budgets().cloned().collect(),
            metadata,
        }
    }

    /// Check the schema version and rebuild a validated ledger
    pub fn into_ledger(self) -> TrackerResult<Ledger> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(TrackerError::Import(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            )));
        }
        Ledger::from_parts(self.expenses, self.weekly_budgets, self.daily_budgets)
            .map_err(|e| TrackerError::Import(e.to_string()))
    }
}

/// Export the full ledger to JSON
pub fn export_full_json<W: Write>(ledger: &Ledger, writer: &mut W, pretty: bool) -> TrackerResult<()> {
    let export = FullExport::from_ledger(ledger);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TrackerError::Export(e.to_string()))?;

    Ok(())
}

/// Parse a JSON export back into a ledger
pub fn import_from_json(json_str: &str) -> TrackerResult<Ledger> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| TrackerError::Import(e.to_string()))?;
    export.into_ledger()
}
