//! Profile and summary command implementations

use anyhow::{Context, Result};
use chrono::Local;
use fins_core::db::{Database, SUMMARY_WINDOW_DAYS};
use fins_core::models::FinancialSummary;

pub fn cmd_profile_set(
    db: &Database,
    user: &str,
    balance: Option<f64>,
    salary: Option<f64>,
) -> Result<()> {
    let profile = db
        .upsert_profile(user, balance, salary)
        .context("Failed to save profile")?;

    println!("✅ Profile saved for {}", profile.user_id);
    print_profile_fields(profile.current_balance, profile.salary);
    Ok(())
}

pub fn cmd_profile_show(db: &Database, user: &str) -> Result<()> {
    match db.get_profile(user)? {
        Some(profile) => {
            println!();
            println!("👤 {}", profile.user_id);
            print_profile_fields(profile.current_balance, profile.salary);
            println!(
                "   Updated: {}",
                profile.updated_at.format("%Y-%m-%d %H:%M")
            );
            println!();
        }
        None => {
            println!("No profile for {}. Analyses will assume a zero balance and salary.", user);
        }
    }
    Ok(())
}

/// Balance, salary and totals over the last 30 days up to today
pub fn cmd_summary(db: &Database, user: &str, json: bool) -> Result<()> {
    let summary = db
        .financial_summary(user, Local::now().date_naive())
        .with_context(|| format!("Summary failed for {}", user))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(s: &FinancialSummary) {
    let flow_icon = if s.net_flow_30_days < 0.0 { "📉" } else { "📈" };

    println!();
    println!("👤 {} as of {}", s.user_id, s.as_of);
    println!("   Balance:        ${:>12.2}", s.current_balance);
    println!("   Monthly salary: ${:>12.2}", s.monthly_salary);
    println!();
    println!("   Last {} days:", SUMMARY_WINDOW_DAYS);
    println!("     Receipts:     ${:>12.2}", s.last_30_days_receipts);
    println!("     Expenses:     ${:>12.2}", s.last_30_days_expenses);
    println!("   {} Net flow:    ${:>12.2}", flow_icon, s.net_flow_30_days);
    println!();
}

fn print_profile_fields(balance: Option<f64>, salary: Option<f64>) {
    let fmt = |v: Option<f64>| v.map(|v| format!("${:.2}", v)).unwrap_or_else(|| "(not set)".into());
    println!("   Balance: {}", fmt(balance));
    println!("   Salary:  {}", fmt(salary));
}
