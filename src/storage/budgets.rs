//! Budget repository for JSON storage
//!
//! Weekly and daily budgets share budgets.json.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::models::{DailyBudget, WeeklyBudget};

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of budgets.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetData {
    #[serde(default)]
    pub weekly: Vec<WeeklyBudget>,
    #[serde(default)]
    pub daily: Vec<DailyBudget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<BudgetData, TrackerError> {
        read_json(&self.path)
    }

    pub fn save(&self, data: &BudgetData) -> Result<(), TrackerError> {
        write_json_atomic(&self.path, data)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
