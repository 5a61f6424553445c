//! CSV import
//!
//! Two layouts are understood:
//!
//! - **Long**: one expense per row, `date,category,amount[,note]`
//! - **Wide**: the spreadsheet layout with one column per category,
//!   `expense_date,transport,food,data,other`; every non-zero cell becomes
//!   a record
//!
//! Parsing never touches the ledger. [`ImportService::commit`] adds the
//! parsed records, skipping ones already present in the ledger. Identical
//! rows within one file are separate entries and all get imported.

use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::audit::EntityType;
use crate::error::{TrackerError, TrackerResult};
use crate::ledger::Ledger;
use crate::models::{ExpenseCategory, ExpenseRecord, Money};
use crate::storage::Storage;

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d/%m/%y",
];

/// Column layout of an import file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Long,
    Wide,
}

impl ImportFormat {
    /// Guess the layout from a header row
    ///
    /// A header naming any category column is wide, everything else long.
    pub fn detect(headers: &StringRecord) -> Self {
        let is_wide = headers
            .iter()
            .any(|h| ExpenseCategory::from_str(h).is_ok());
        if is_wide {
            ImportFormat::Wide
        } else {
            ImportFormat::Long
        }
    }
}

impl FromStr for ImportFormat {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(ImportFormat::Long),
            "wide" => Ok(ImportFormat::Wide),
            other => Err(TrackerError::Validation(format!(
                "Unknown import format '{}' (expected long or wide)",
                other
            ))),
        }
    }
}

/// A row that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// Line number in the file, counting the header as line 1
    pub line: usize,
    pub message: String,
}

/// Records parsed from a file, not yet added to the ledger
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub format: Option<ImportFormat>,
    pub records: Vec<ExpenseRecord>,
    pub errors: Vec<RowError>,
}

/// Outcome of committing parsed records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
}

/// Parse expense rows from CSV
///
/// `format` of `None` detects the layout from the header row. A missing
/// required column fails the whole import; bad individual rows are reported
/// in [`ParsedImport::errors`] and skipped.
pub fn import_csv<R: Read>(reader: R, format: Option<ImportFormat>) -> TrackerResult<ParsedImport> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let format = format.unwrap_or_else(|| ImportFormat::detect(&headers));
    let layout = Layout::from_headers(&headers, format)?;

    let mut parsed = ParsedImport {
        format: Some(format),
        ..Default::default()
    };

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                parsed.errors.push(RowError {
                    line,
                    message: format!("Unreadable row: {}", e),
                });
                continue;
            }
        };
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        match layout.parse_row(&row) {
            Ok(records) => parsed.records.extend(records),
            Err(message) => parsed.errors.push(RowError { line, message }),
        }
    }

    tracing::debug!(
        ?format,
        records = parsed.records.len(),
        errors = parsed.errors.len(),
        "parsed import file"
    );
    Ok(parsed)
}

/// Column positions resolved from the header row
enum Layout {
    Long {
        date: usize,
        category: usize,
        amount: usize,
        note: Option<usize>,
    },
    Wide {
        date: usize,
        categories: Vec<(ExpenseCategory, usize)>,
    },
}

impl Layout {
    fn from_headers(headers: &StringRecord, format: ImportFormat) -> TrackerResult<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| {
                TrackerError::Import(format!("Missing required column '{}'", names[0]))
            })
        };

        match format {
            ImportFormat::Long => Ok(Layout::Long {
                date: require(&["date", "expense_date"])?,
                category: require(&["category"])?,
                amount: require(&["amount"])?,
                note: find(&["note", "notes", "memo"]),
            }),
            ImportFormat::Wide => {
                let date = require(&["expense_date", "date"])?;
                let categories: Vec<_> = ExpenseCategory::ALL
                    .iter()
                    .filter_map(|&c| find(&[c.as_str()]).map(|idx| (c, idx)))
                    .collect();
                if categories.is_empty() {
                    return Err(TrackerError::Import(
                        "Wide format needs at least one category column".into(),
                    ));
                }
                Ok(Layout::Wide { date, categories })
            }
        }
    }

    fn parse_row(&self, row: &StringRecord) -> Result<Vec<ExpenseRecord>, String> {
        match self {
            Layout::Long {
                date,
                category,
                amount,
                note,
            } => {
                let date = parse_date_cell(row.get(*date).unwrap_or(""))?;
                let category = row
                    .get(*category)
                    .unwrap_or("")
                    .parse::<ExpenseCategory>()
                    .map_err(|e| e.to_string())?;
                let amount = parse_amount_cell(row.get(*amount).unwrap_or(""))?;
                let note = note.and_then(|idx| row.get(idx)).map(str::to_string);
                Ok(vec![ExpenseRecord::new(date, category, amount, note)])
            }
            Layout::Wide { date, categories } => {
                let date = parse_date_cell(row.get(*date).unwrap_or(""))?;
                let mut records = Vec::new();
                for &(category, idx) in categories {
                    let cell = row.get(idx).unwrap_or("");
                    if cell.is_empty() {
                        continue;
                    }
                    let amount = parse_amount_cell(cell)
                        .map_err(|e| format!("{} column: {}", category, e))?;
                    if !amount.is_zero() {
                        records.push(ExpenseRecord::new(date, category, amount, None));
                    }
                }
                Ok(records)
            }
        }
    }
}

fn parse_date_cell(cell: &str) -> Result<NaiveDate, String> {
    // Spreadsheet exports often carry a midnight time component
    let cell = cell.split_whitespace().next().unwrap_or("");
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", cell))
}

fn parse_amount_cell(cell: &str) -> Result<Money, String> {
    let amount = Money::parse(cell).map_err(|e| format!("Could not parse amount: {}", e))?;
    if amount.is_negative() {
        return Err(format!("Amount must not be negative: '{}'", cell));
    }
    Ok(amount)
}

/// Service that commits parsed imports to storage
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add parsed records to the ledger
    ///
    /// A record is a duplicate when a record already in the ledger has the
    /// same date, category, amount and note. Each existing record absorbs at
    /// most one incoming match, so re-importing a file skips every row while
    /// repeated rows in a fresh file are all kept.
    pub fn commit(&self, records: Vec<ExpenseRecord>) -> TrackerResult<ImportResult> {
        let mut ledger = self.storage.load_ledger()?;
        let mut existing: HashMap<_, usize> = HashMap::new();
        for record in ledger.expenses() {
            *existing.entry(duplicate_key(record)).or_default() += 1;
        }

        let mut result = ImportResult::default();
        let mut added = Vec::new();
        for record in records {
            if let Some(count) = existing.get_mut(&duplicate_key(&record)).filter(|c| **c > 0) {
                *count -= 1;
                result.duplicates_skipped += 1;
                continue;
            }
            ledger.add_expense(record.clone())?;
            added.push(record);
        }
        result.imported = added.len();

        if !added.is_empty() {
            self.storage.save_ledger(&ledger)?;
            for record in &added {
                self.storage
                    .log_create(EntityType::Expense, record.id.to_string(), record)?;
            }
        }

        tracing::info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            "import committed"
        );
        Ok(result)
    }

    /// Replace the stored ledger with one read from a full export
    ///
    /// Refuses to overwrite a non-empty ledger unless `force` is set.
    /// Returns the number of expenses restored.
    pub fn restore(&self, restored: Ledger, force: bool) -> TrackerResult<usize> {
        let current = self.storage.load_ledger()?;
        let has_data = !current.is_empty()
            || current.weekly_budgets().next().is_some()
            || current.daily_budgets().next().is_some();
        if has_data && !force {
            return Err(TrackerError::Import(
                "Ledger already holds data; use --force to replace it".into(),
            ));
        }

        self.storage.save_ledger(&restored)?;

        for record in current.expenses() {
            self.storage
                .log_delete(EntityType::Expense, record.id.to_string(), record)?;
        }
        for record in restored.expenses() {
            self.storage
                .log_create(EntityType::Expense, record.id.to_string(), record)?;
        }

        tracing::info!(
            replaced = current.len(),
            restored = restored.len(),
            "ledger restored from export"
        );
        Ok(restored.len())
    }
}

fn duplicate_key(record: &ExpenseRecord) -> (NaiveDate, ExpenseCategory, Money, String) {
    (
        record.date,
        record.category,
        record.amount,
        record.note_or_empty().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::DateRange;
    use tempfile::TempDir;

    #[test]
    fn test_long_format() {
        let data = "date,category,amount,note\n\
                    2025-01-06,food,12.50,lunch\n\
                    2025-01-07,Transport,4,\n";
        let parsed = import_csv(data.as_bytes(), None).unwrap();

        assert_eq!(parsed.format, Some(ImportFormat::Long));
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].amount, Money::from_cents(1250));
        assert_eq!(parsed.records[0].note.as_deref(), Some("lunch"));
        assert_eq!(parsed.records[1].category, ExpenseCategory::Transport);
        assert_eq!(parsed.records[1].note, None);
    }

    #[test]
    fn test_wide_format_one_record_per_nonzero_cell() {
        let data = "expense_date,transport,food,data,other\n\
                    2025-01-06 00:00:00,5,12.5,0,\n\
                    2025-01-07,0,0,0,0\n\
                    2025-01-08,3,0,2,1\n";
        let parsed = import_csv(data.as_bytes(), None).unwrap();

        assert_eq!(parsed.format, Some(ImportFormat::Wide));
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.records.len(), 5);
        let total: Money = parsed.records.iter().map(|r| r.amount).sum();
        assert_eq!(total, Money::from_cents(2350));
    }

    #[test]
    fn test_row_errors_reported_with_line_numbers() {
        let data = "date,category,amount\n\
                    2025-01-06,food,10\n\
                    not-a-date,food,10\n\
                    2025-01-08,rent,10\n\
                    2025-01-09,food,-3\n";
        let parsed = import_csv(data.as_bytes(), Some(ImportFormat::Long)).unwrap();

        assert_eq!(parsed.records.len(), 1);
        let lines: Vec<_> = parsed.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn test_missing_column_fails_import() {
        let data = "date,amount\n2025-01-06,10\n";
        let err = import_csv(data.as_bytes(), Some(ImportFormat::Long)).unwrap_err();
        assert!(matches!(err, TrackerError::Import(_)));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("Wide".parse::<ImportFormat>().unwrap(), ImportFormat::Wide);
        assert!("tall".parse::<ImportFormat>().is_err());
    }

    #[test]
    fn test_commit_keeps_repeated_rows_and_skips_reimport() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(TrackerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let service = ImportService::new(&storage);

        let data = "date,category,amount\n2025-01-06,food,10\n2025-01-06,food,10\n";
        let parsed = import_csv(data.as_bytes(), None).unwrap();
        let result = service.commit(parsed.records).unwrap();
        assert_eq!(result.imported, 2);
        assert_eq!(result.duplicates_skipped, 0);

        let again = import_csv(data.as_bytes(), None).unwrap();
        let result = service.commit(again.records).unwrap();
        assert_eq!(result.imported, 0);
        assert_eq!(result.duplicates_skipped, 2);
        assert_eq!(storage.load_ledger().unwrap().len(), 2);

        // A third identical row only matches once the two stored ones are used up
        let three = "date,category,amount\n2025-01-06,food,10\n2025-01-06,food,10\n2025-01-06,food,10\n";
        let result = service
            .commit(import_csv(three.as_bytes(), None).unwrap().records)
            .unwrap();
        assert_eq!(result.imported, 1);
        assert_eq!(result.duplicates_skipped, 2);
    }

    #[test]
    fn test_wide_rows_for_same_day_are_summed() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(TrackerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let service = ImportService::new(&storage);

        let data = "expense_date,transport,food,data,other\n\
                    2025-01-06,5,0,0,0\n\
                    2025-01-06,5,0,0,0\n";
        let parsed = import_csv(data.as_bytes(), None).unwrap();
        assert_eq!(parsed.records.len(), 2);
        service.commit(parsed.records).unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let ledger = storage.load_ledger().unwrap();
        assert_eq!(ledger.total_spend(DateRange::new(day, day)), Money::from_major(10));
    }

    #[test]
    fn test_restore_refuses_to_overwrite_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(TrackerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let service = ImportService::new(&storage);

        let data = "date,category,amount\n2025-01-06,food,10\n";
        service
            .commit(import_csv(data.as_bytes(), None).unwrap().records)
            .unwrap();

        let mut backup = Ledger::new();
        let day = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        backup
            .add_expense(ExpenseRecord::new(day, ExpenseCategory::Data, Money::from_major(8), None))
            .unwrap();
        backup
            .add_expense(ExpenseRecord::new(day, ExpenseCategory::Food, Money::from_major(3), None))
            .unwrap();

        let err = service.restore(backup.clone(), false).unwrap_err();
        assert!(matches!(err, TrackerError::Import(_)));
        assert_eq!(storage.load_ledger().unwrap().len(), 1);

        assert_eq!(service.restore(backup.clone(), true).unwrap(), 2);
        assert_eq!(storage.load_ledger().unwrap(), backup);
    }
}
