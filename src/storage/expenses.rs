//! Expense repository for JSON storage
//!
//! Reads and rewrites expenses.json as a whole.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::models::ExpenseRecord;

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of expenses.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ExpenseData {
    #[serde(default)]
    expenses: Vec<ExpenseRecord>,
}

/// Repository for expense record persistence
pub struct ExpenseRepository {
    path: PathBuf,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load every record, in the order they were saved
    pub fn load(&self) -> Result<Vec<ExpenseRecord>, TrackerError> {
        let data: ExpenseData = read_json(&self.path)?;
        Ok(data.expenses)
    }

    /// Rewrite the file with `expenses`
    pub fn save(&self, expenses: &[ExpenseRecord]) -> Result<(), TrackerError> {
        let data = ExpenseData {
            expenses: expenses.to_vec(),
        };
        write_json_atomic(&self.path, &data)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
