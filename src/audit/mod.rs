//! Audit logging
//!
//! Every create, update and delete on the ledger is appended to a JSONL log
//! with before/after values, so the history of a flat-file ledger that is
//! rewritten on every save can still be reconstructed.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::{AuditLogger, AuditQuery};
