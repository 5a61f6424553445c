//! Expense Tracker - personal expense ledger for the terminal
//!
//! This library provides the core functionality for the `expense` command
//! line tool. It records daily expenses in four categories, tracks them
//! against weekly and daily budgets, and derives totals, category breakdowns,
//! spending patterns and anomalous days from the recorded data.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, categories, budgets, money, ranges)
//! - `ledger`: In-memory ledger with validation and aggregate queries
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `reports`: Summary, category, period, pattern, timeline and anomaly reports
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal table formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
//! use expense_tracker::storage::Storage;
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let ledger = Storage::new(paths)?.load_ledger()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};

use std::sync::Once;

/// Environment variable holding the log filter (e.g. `expense_tracker=debug`)
pub const LOG_ENV: &str = "EXPENSE_LOG";

const DEFAULT_LOG_DIRECTIVE: &str = "expense_tracker=warn";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber, logging to stderr
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
