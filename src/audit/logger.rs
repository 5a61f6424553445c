//! Append-only audit logger
//!
//! One JSON object per line. A torn final line (from a crash mid-write) is
//! reported as a parse error with its line number rather than skipped.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{TrackerError, TrackerResult};

use super::entry::{AuditEntry, EntityType};

/// Selects entries when reading the log back
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub entity_type: Option<EntityType>,
    /// Matches the recorded entity ID exactly (e.g. `exp-1a2b3c4d` or `2025-01-06`)
    pub entity_id: Option<String>,
    /// Keep only the last `limit` matches
    pub limit: Option<usize>,
}

impl AuditQuery {
    fn matches(&self, entry: &AuditEntry) -> bool {
        self.entity_type.map_or(true, |t| entry.entity_type == t)
            && self
                .entity_id
                .as_deref()
                .map_or(true, |id| entry.entity_id == id)
    }
}

/// Writes ledger changes to a JSONL file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry and flush it
    pub fn log(&self, entry: &AuditEntry) -> TrackerResult<()> {
        let line = serde_json::to_string(entry)
            .map_err(|e| TrackerError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| io_error("open", &self.log_path, e))?;

        writeln!(file, "{}", line)
            .and_then(|_| file.flush())
            .map_err(|e| io_error("write", &self.log_path, e))?;

        tracing::trace!(
            operation = %entry.operation,
            entity = %entry.entity_type,
            id = %entry.entity_id,
            "audit entry written"
        );
        Ok(())
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> TrackerResult<Vec<AuditEntry>> {
        self.query(&AuditQuery::default())
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> TrackerResult<Vec<AuditEntry>> {
        self.query(&AuditQuery {
            limit: Some(count),
            ..AuditQuery::default()
        })
    }

    /// Entries matching `query`, oldest first
    pub fn query(&self, query: &AuditQuery) -> TrackerResult<Vec<AuditEntry>> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("open", &self.log_path, e)),
        };

        let mut entries = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| io_error("read", &self.log_path, e))?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                TrackerError::Json(format!("Bad audit entry at line {}: {}", idx + 1, e))
            })?;
            if query.matches(&entry) {
                entries.push(entry);
            }
        }

        if let Some(limit) = query.limit {
            let skip = entries.len().saturating_sub(limit);
            entries.drain(..skip);
        }
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> TrackerError {
    TrackerError::Io(format!(
        "Failed to {} audit log {}: {}",
        action,
        path.display(),
        err
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        let entry = AuditEntry::create(EntityType::Expense, "exp-12345678", &json!({"amount": 100}));

        logger.log(&entry).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Expense);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();
        for i in 0..10 {
            let entry = AuditEntry::create(EntityType::Expense, format!("exp-{}", i), &json!({ "i": i }));
            logger.log(&entry).unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        let ids: Vec<_> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["exp-7", "exp-8", "exp-9"]);
    }

    #[test]
    fn test_query_by_entity() {
        let (logger, _temp) = create_test_logger();
        let week = "2025-01-06";
        logger
            .log(&AuditEntry::create(EntityType::WeeklyBudget, week, &json!({"limit": 100})))
            .unwrap();
        logger
            .log(&AuditEntry::create(EntityType::Expense, "exp-1", &json!({"amount": 5})))
            .unwrap();
        logger
            .log(&AuditEntry::update(
                EntityType::WeeklyBudget,
                week,
                &json!({"limit": 100}),
                &json!({"limit": 150}),
            ))
            .unwrap();

        let budget_history = logger
            .query(&AuditQuery {
                entity_type: Some(EntityType::WeeklyBudget),
                entity_id: Some(week.into()),
                limit: None,
            })
            .unwrap();
        assert_eq!(budget_history.len(), 2);
        assert_eq!(budget_history[1].diff_summary.as_deref(), Some("limit: 100 -> 150"));

        let expenses = logger
            .query(&AuditQuery {
                entity_type: Some(EntityType::Expense),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(expenses.len(), 1);
    }

    #[test]
    fn test_corrupt_line_reports_line_number() {
        let (logger, _temp) = create_test_logger();
        logger
            .log(&AuditEntry::create(EntityType::Expense, "exp-1", &json!({})))
            .unwrap();
        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        writeln!(file, "{{\"timestamp\":").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert!(logger.read_recent(5).unwrap().is_empty());
    }
}
