use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::audit::{AuditQuery, EntityType};
use expense_tracker::cli::{
    handle_budget_command, handle_expense_command, handle_export_command, handle_import_command,
    handle_report_command, BudgetCommands, ExpenseCommands, ExportCommands, ImportCommands,
    ReportCommands,
};
use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
use expense_tracker::services::parse_amount;
use expense_tracker::storage::Storage;

#[derive(Parser)]
#[command(
    name = "expense",
    version,
    about = "Personal expense ledger with weekly budgets and spending analytics",
    long_about = "Record daily expenses (transport, food, data, other), set weekly and \
                  daily spending limits, and see where the money goes: summaries, \
                  category breakdowns, weekly and monthly rollups, day-of-week \
                  patterns and unusually expensive days."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Weekly and daily budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Spending reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export data to CSV, JSON or YAML
    #[command(subcommand)]
    Export(ExportCommands),

    /// Import expenses from CSV or restore a full export
    #[command(subcommand)]
    Import(ImportCommands),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only changes to one kind of entity (expense, weekly-budget, daily-budget)
        #[arg(short, long)]
        entity: Option<String>,
        /// Only changes to one expense ID or budget date
        #[arg(long)]
        id: Option<String>,
    },

    /// Initialize the data directory and settings file
    Init,

    /// Show or change configuration
    Config {
        /// Currency symbol for terminal output
        #[arg(long)]
        currency: Option<String>,
        /// Default anomaly threshold in standard deviations
        #[arg(long)]
        threshold: Option<f64>,
        /// Default weekly limit used by `budget set`
        #[arg(long)]
        weekly_limit: Option<String>,
    },
}

fn main() -> Result<()> {
    expense_tracker::init_tracing();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TrackerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Import(cmd)) => handle_import_command(&storage, &settings, cmd)?,
        Some(Commands::History { limit, entity, id }) => {
            let query = AuditQuery {
                entity_type: entity.as_deref().map(str::parse::<EntityType>).transpose()?,
                entity_id: id,
                limit: Some(limit),
            };
            let entries = storage.audit().query(&query)?;
            if entries.is_empty() {
                println!("No changes recorded yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Record your first expense with 'expense expense add food 12.50'.");
        }
        Some(Commands::Config {
            currency,
            threshold,
            weekly_limit,
        }) => {
            let changed = currency.is_some() || threshold.is_some() || weekly_limit.is_some();
            if let Some(currency) = currency {
                settings.currency_symbol = currency;
            }
            if let Some(threshold) = threshold {
                settings.anomaly_threshold = threshold;
            }
            if let Some(limit) = weekly_limit {
                settings.default_weekly_limit = Some(parse_amount(&limit)?);
            }
            if changed {
                settings.validate()?;
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!("  Anomaly threshold: {}", settings.anomaly_threshold);
            match settings.default_weekly_limit {
                Some(limit) => println!("  Default weekly limit: {}", settings.money(limit)),
                None => println!("  Default weekly limit: (none)"),
            }
        }
        None => {
            println!("Expense Tracker - personal expense ledger");
            println!();
            println!("Run 'expense --help' for usage information.");
        }
    }

    Ok(())
}
