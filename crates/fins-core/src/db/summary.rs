//! Financial summary: declared profile plus the last 30 days of activity

use chrono::{Duration, NaiveDate};
use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::FinancialSummary;

/// Length of the recent-activity window, ending on (and including) `as_of`
pub const SUMMARY_WINDOW_DAYS: i64 = 30;

impl Database {
    /// Summarize a user's profile and recent expenses and receipts
    ///
    /// Fails with `NotFound` when the user has no profile.
    pub fn financial_summary(&self, user_id: &str, as_of: NaiveDate) -> Result<FinancialSummary> {
        let profile = self
            .get_profile(user_id)?
            .ok_or_else(|| Error::NotFound(format!("profile for user {}", user_id)))?;

        let since = as_of
            .checked_sub_signed(Duration::days(SUMMARY_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);
        let (since, until) = (since.to_string(), as_of.to_string());

        let conn = self.conn()?;
        let (expenses, receipts): (f64, f64) = conn.query_row(
            "SELECT
                (SELECT COALESCE(SUM(amount), 0) FROM expenses
                 WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3),
                (SELECT COALESCE(SUM(amount), 0) FROM incomes
                 WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3)",
            params![user_id, since, until],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(FinancialSummary {
            user_id: user_id.to_string(),
            as_of,
            current_balance: profile.starting_balance(),
            monthly_salary: profile.salary_or_zero(),
            last_30_days_expenses: expenses,
            last_30_days_receipts: receipts,
            net_flow_30_days: receipts - expenses,
        })
    }
}
