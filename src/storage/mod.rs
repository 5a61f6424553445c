//! Storage layer for the expense tracker
//!
//! A flat-file round trip: everything is loaded into a [`Ledger`] at startup
//! and every file is rewritten atomically on save.

pub mod budgets;
pub mod expenses;
pub mod file_io;

pub use budgets::{BudgetData, BudgetRepository};
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TrackerPaths;
use crate::error::TrackerError;
use crate::ledger::Ledger;

/// Main storage coordinator
pub struct Storage {
    paths: TrackerPaths,
    pub expenses: ExpenseRepository,
    pub budgets: BudgetRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: TrackerPaths) -> Result<Self, TrackerError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }

    /// Load all data from disk into a validated ledger
    pub fn load_ledger(&self) -> Result<Ledger, TrackerError> {
        let expenses = self.expenses.load()?;
        let budgets = self.budgets.load()?;

        let ledger = Ledger::from_parts(expenses, budgets.weekly, budgets.daily).map_err(|e| {
            TrackerError::Storage(format!(
                "Stored data in {} failed validation: {}",
                self.paths.data_dir().display(),
                e
            ))
        })?;

        tracing::debug!(
            expenses = ledger.len(),
            weekly_budgets = ledger.weekly_budgets().count(),
            "loaded ledger"
        );
        Ok(ledger)
    }

    /// Rewrite all files from the ledger
    pub fn save_ledger(&self, ledger: &Ledger) -> Result<(), TrackerError> {
        self.expenses.save(ledger.expenses())?;
        self.budgets.save(&BudgetData {
            weekly: ledger.weekly_budgets().cloned().collect(),
            daily: ledger.daily_budgets().cloned().collect(),
        })?;
        tracing::debug!(expenses = ledger.len(), "saved ledger");
        Ok(())
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Result<(), TrackerError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Result<(), TrackerError> {
        self.audit
            .log(&AuditEntry::update(entity_type, entity_id, before, after))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Result<(), TrackerError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity))
    }
}
