//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FINS - Personal finance analytics
#[derive(Parser)]
#[command(name = "fins")]
#[command(about = "Forecasts, savings, risk and expense analysis for a personal ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "fins.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set FINS_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Analytics config file (defaults to the data-dir override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status and users
    Status,

    /// Manage a user's declared balance and salary
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Record, edit or remove an expense
    Expense {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Record, edit or remove an income
    Income {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Import expenses or incomes from CSV (date,amount,category,description)
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// User the records belong to
        #[arg(short, long)]
        user: String,

        /// Record kind: expense or income
        #[arg(short, long)]
        kind: String,
    },

    /// Show balance, salary and the last 30 days of activity
    Summary {
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        json: bool,
    },

    /// Show a user's cash-flow series with running balance
    Ledger {
        #[arg(short, long)]
        user: String,

        /// Show only the most recent N events
        #[arg(short, long, default_value = "30")]
        limit: usize,
    },

    /// Forecast balance or savings
    Predict {
        #[command(subcommand)]
        action: PredictAction,
    },

    /// Score delinquency risk
    Risk {
        #[arg(short, long)]
        user: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Analyze expenses by category, trend and outliers
    Expenses {
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        json: bool,
    },

    /// Full financial-health report
    Insights {
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        json: bool,
    },

    /// Report which analyses have enough data
    Health {
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create or update a profile (omitted fields keep their value)
    Set {
        #[arg(short, long)]
        user: String,

        /// Current balance the ledger starts from
        #[arg(long, allow_negative_numbers = true)]
        balance: Option<f64>,

        /// Monthly salary
        #[arg(long)]
        salary: Option<f64>,
    },

    /// Show a profile
    Show {
        #[arg(short, long)]
        user: String,
    },
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Add a record
    Add {
        #[arg(short, long)]
        user: String,

        /// Amount (stored as a magnitude)
        #[arg(short, long, allow_negative_numbers = true)]
        amount: f64,

        /// Date (YYYY-MM-DD, MM/DD/YYYY); defaults to today
        #[arg(long)]
        date: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Change fields of a record (omitted fields keep their value)
    Edit {
        #[arg(short, long)]
        user: String,

        /// Record ID
        id: i64,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,

        #[arg(long)]
        date: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a record by ID
    Delete {
        /// Owner of the record
        #[arg(short, long)]
        user: String,

        /// Record ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum PredictAction {
    /// Forecast the balance indicator
    Balance {
        #[arg(short, long)]
        user: String,

        /// Months ahead (defaults to the configured horizon)
        #[arg(short, long)]
        months: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Estimate savings capacity
    Savings {
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        json: bool,
    },
}
