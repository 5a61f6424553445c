//! Expense service
//!
//! Adding, removing and listing expense records. Each mutation loads the
//! ledger, applies the change, saves it back and writes an audit entry.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{DateRange, ExpenseCategory, ExpenseRecord, Money};
use crate::storage::Storage;

/// Service for expense record management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// Options for filtering expense listings
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub range: Option<DateRange>,
    pub category: Option<ExpenseCategory>,
    /// Keep only the most recent `limit` records
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Raw user input for a new expense
///
/// Category and amount arrive as text and are parsed by [`ExpenseService::add`].
#[derive(Debug, Clone)]
pub struct AddExpenseInput {
    pub date: NaiveDate,
    pub category: String,
    pub amount: String,
    pub note: Option<String>,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and record a new expense
    pub fn add(&self, input: AddExpenseInput) -> TrackerResult<ExpenseRecord> {
        let category: ExpenseCategory = input.category.parse()?;
        let amount = parse_amount(&input.amount)?;
        let record = ExpenseRecord::new(input.date, category, amount, input.note);

        let mut ledger = self.storage.load_ledger()?;
        ledger.add_expense(record.clone())?;
        self.storage.save_ledger(&ledger)?;

        self.storage
            .log_create(EntityType::Expense, record.id.to_string(), &record)?;
        tracing::info!(
            id = %record.id,
            date = %record.date,
            category = %record.category,
            amount = %record.amount,
            "expense added"
        );

        Ok(record)
    }

    /// Remove the expense matching `reference` (full UUID, "exp-" short form or prefix)
    pub fn remove(&self, reference: &str) -> TrackerResult<ExpenseRecord> {
        let mut ledger = self.storage.load_ledger()?;
        let id = ledger.find_expense(reference)?.id;
        let removed = ledger.remove_expense(id)?;
        self.storage.save_ledger(&ledger)?;

        self.storage
            .log_delete(EntityType::Expense, removed.id.to_string(), &removed)?;
        tracing::info!(id = %removed.id, "expense removed");

        Ok(removed)
    }

    /// Look up a single expense
    pub fn get(&self, reference: &str) -> TrackerResult<ExpenseRecord> {
        let ledger = self.storage.load_ledger()?;
        ledger.find_expense(reference).cloned()
    }

    /// List expenses ordered by date (then entry time)
    pub fn list(&self, filter: &ExpenseFilter) -> TrackerResult<Vec<ExpenseRecord>> {
        let ledger = self.storage.load_ledger()?;

        let mut records: Vec<ExpenseRecord> = ledger
            .expenses()
            .iter()
            .filter(|r| filter.range.map_or(true, |range| range.contains(r.date)))
            .filter(|r| filter.category.map_or(true, |c| r.category == c))
            .cloned()
            .collect();

        records.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

        if let Some(limit) = filter.limit {
            let skip = records.len().saturating_sub(limit);
            records.drain(..skip);
        }

        Ok(records)
    }
}

/// Parse a user-entered amount, rejecting negatives
pub fn parse_amount(input: &str) -> TrackerResult<Money> {
    let amount = Money::parse(input)
        .map_err(|e| TrackerError::Validation(format!("Invalid amount: {}", e)))?;
    if amount.is_negative() {
        return Err(TrackerError::Validation(format!(
            "Amount must not be negative (got {})",
            input.trim()
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn input(day: u32, category: &str, amount: &str) -> AddExpenseInput {
        AddExpenseInput {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            category: category.into(),
            amount: amount.into(),
            note: None,
        }
    }

    #[test]
    fn test_add_persists_and_audits() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let record = service.add(input(6, "Food", "12.50")).unwrap();
        assert_eq!(record.category, ExpenseCategory::Food);
        assert_eq!(record.amount, Money::from_cents(1250));

        let ledger = storage.load_ledger().unwrap();
        assert_eq!(ledger.len(), 1);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_id, record.id.to_string());
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        assert!(service.add(input(6, "rent", "10")).unwrap_err().is_validation());
        assert!(service.add(input(6, "food", "-5")).unwrap_err().is_validation());
        assert!(service.add(input(6, "food", "abc")).unwrap_err().is_validation());
        assert!(storage.load_ledger().unwrap().is_empty());
    }

    #[test]
    fn test_parse_amount_rejects_overflowing_input() {
        let err = parse_amount("100000000000000000").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Invalid amount"));
    }

    #[test]
    fn test_remove_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let record = service.add(input(6, "data", "5")).unwrap();

        let removed = service.remove(&record.id.to_string()).unwrap();
        assert_eq!(removed.id, record.id);
        assert!(storage.load_ledger().unwrap().is_empty());
        assert!(service.remove(&record.id.to_string()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_filters_and_limits() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        service.add(input(8, "food", "3")).unwrap();
        service.add(input(6, "transport", "2")).unwrap();
        service.add(input(7, "food", "4")).unwrap();

        let food = service
            .list(&ExpenseFilter::new().category(ExpenseCategory::Food))
            .unwrap();
        assert_eq!(food.len(), 2);
        assert_eq!(food[0].date, NaiveDate::from_ymd_opt(2025, 1, 7).unwrap());

        let latest = service.list(&ExpenseFilter::new().limit(1)).unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].date, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());

        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let in_range = service
            .list(&ExpenseFilter::new().range(DateRange::day(day)))
            .unwrap();
        assert_eq!(in_range.len(), 1);
    }
}
