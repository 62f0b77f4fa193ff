//! FINS CLI - Personal finance analytics
//!
//! Usage:
//!   fins init                                 Initialize database
//!   fins import --file CSV --user U --kind K  Import expenses or incomes
//!   fins summary --user U                     Balance and last-30-day totals
//!   fins insights --user U                    Full financial-health report
//!   fins predict balance --user U --months 3  Forecast balance

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fins_core::{models::LedgerKind, InsightEngine};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let options = EngineOptions {
        db: cli.db.clone(),
        no_encrypt: cli.no_encrypt,
        config: cli.config.clone(),
    };

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Profile { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                ProfileAction::Set {
                    user,
                    balance,
                    salary,
                } => commands::cmd_profile_set(&db, &user, balance, salary),
                ProfileAction::Show { user } => commands::cmd_profile_show(&db, &user),
            }
        }
        Commands::Expense { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_record(&db, LedgerKind::Expense, action)
        }
        Commands::Income { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_record(&db, LedgerKind::Income, action)
        }
        Commands::Import { file, user, kind } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, &file, &user, &kind)
        }
        Commands::Summary { user, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_summary(&db, &user, json)
        }
        Commands::Ledger { user, limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_ledger(&db, &user, limit, &config)
        }
        Commands::Predict { action } => with_engine(&options, |engine| match action {
            PredictAction::Balance { user, months, json } => {
                commands::cmd_predict_balance(engine, &user, months, json)
            }
            PredictAction::Savings { user, json } => {
                commands::cmd_predict_savings(engine, &user, json)
            }
        }),
        Commands::Risk { user, json } => {
            with_engine(&options, |engine| commands::cmd_risk(engine, &user, json))
        }
        Commands::Expenses { user, json } => {
            with_engine(&options, |engine| commands::cmd_expenses(engine, &user, json))
        }
        Commands::Insights { user, json } => {
            with_engine(&options, |engine| commands::cmd_insights(engine, &user, json))
        }
        Commands::Health { user, json } => {
            with_engine(&options, |engine| commands::cmd_health(engine, &user, json))
        }
    }
}

/// What an analysis command needs to build its engine
struct EngineOptions {
    db: PathBuf,
    no_encrypt: bool,
    config: Option<PathBuf>,
}

/// Open the database, load the analytics config and run one analysis command
fn with_engine(
    options: &EngineOptions,
    run: impl FnOnce(&InsightEngine<'_>) -> Result<()>,
) -> Result<()> {
    let db = commands::open_db(&options.db, options.no_encrypt)?;
    let config = commands::load_config(options.config.as_deref())?;
    run(&InsightEngine::new(&db, config))
}
