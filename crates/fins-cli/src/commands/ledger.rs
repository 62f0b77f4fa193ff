//! Ledger record commands (add, edit, delete, list)

use anyhow::{Context, Result};
use chrono::Local;
use fins_core::db::Database;
use fins_core::import::manual_record;
use fins_core::ledger::load_snapshot;
use fins_core::models::{LedgerKind, LedgerUpdate};
use fins_core::AnalyticsConfig;

use super::{parse_date_arg, truncate};
use crate::cli::RecordAction;

pub fn cmd_record(db: &Database, kind: LedgerKind, action: RecordAction) -> Result<()> {
    match action {
        RecordAction::Add {
            user,
            amount,
            date,
            category,
            description,
        } => cmd_record_add(db, kind, &user, amount, date.as_deref(), category, &description),
        RecordAction::Edit {
            user,
            id,
            amount,
            date,
            category,
            description,
        } => {
            let update = LedgerUpdate {
                date: date.as_deref().map(|d| parse_date_arg(Some(d))).transpose()?,
                amount,
                category,
                description,
            };
            cmd_record_edit(db, kind, &user, id, &update)
        }
        RecordAction::Delete { user, id } => cmd_record_delete(db, kind, &user, id),
    }
}

pub fn cmd_record_add(
    db: &Database,
    kind: LedgerKind,
    user: &str,
    amount: f64,
    date: Option<&str>,
    category: Option<String>,
    description: &str,
) -> Result<()> {
    let date = parse_date_arg(date)?;
    let record = manual_record(user, kind, date, amount, category, description);

    let id = db
        .insert_record(user, &record)
        .with_context(|| format!("Failed to add {}", kind))?;

    match id {
        Some(id) => println!(
            "✅ Added {} #{}: ${:.2} on {} ({})",
            kind,
            id,
            record.amount,
            date,
            record.category_or_default()
        ),
        None => println!("⏭️  Skipped duplicate {}", kind),
    }
    Ok(())
}

pub fn cmd_record_edit(
    db: &Database,
    kind: LedgerKind,
    user: &str,
    id: i64,
    update: &LedgerUpdate,
) -> Result<()> {
    let record = db
        .update_record(user, kind, id, update)
        .with_context(|| format!("Failed to edit {} #{}", kind, id))?;
    println!(
        "✏️  Updated {} #{}: ${:.2} on {} ({}) {}",
        kind, record.id, record.amount, record.date, record.category, record.description
    );
    Ok(())
}

pub fn cmd_record_delete(db: &Database, kind: LedgerKind, user: &str, id: i64) -> Result<()> {
    db.delete_record(user, kind, id)
        .with_context(|| format!("Failed to delete {} #{}", kind, id))?;
    println!("🗑️  Deleted {} #{}", kind, id);
    Ok(())
}

/// Print the most recent events of a user's cash-flow series
pub fn cmd_ledger(db: &Database, user: &str, limit: usize, config: &AnalyticsConfig) -> Result<()> {
    let today = Local::now().date_naive();
    let snapshot = load_snapshot(db, user, config.ledger.lookback_months, today)
        .context("Failed to load ledger")?;
    let series = &snapshot.series;

    println!();
    println!(
        "📒 Ledger for {} (since {}, starting balance ${:.2})",
        user, snapshot.window_start, series.starting_balance()
    );

    if series.is_empty() {
        println!("   No records in the lookback window.");
        println!();
        return Ok(());
    }

    println!();
    println!(
        "   {:<10}  {:>12}  {:>12}  {:<14}  Description",
        "Date", "Amount", "Balance", "Category"
    );
    println!("   {}", "─".repeat(72));

    let skip = series.len().saturating_sub(limit);
    for (event, balance) in series.events().iter().zip(series.balances()).skip(skip) {
        println!(
            "   {:<10}  {:>12.2}  {:>12.2}  {:<14}  {}",
            event.date,
            event.amount,
            balance,
            truncate(&event.category, 14),
            truncate(&event.description, 30)
        );
    }

    println!();
    println!(
        "   {} events, final balance ${:.2}",
        series.len(),
        series.final_balance()
    );
    println!();
    Ok(())
}
