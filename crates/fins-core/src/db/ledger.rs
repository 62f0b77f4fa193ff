//! Expense and income record operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{parse_date_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::ledger::LedgerStore;
use crate::models::{
    LedgerCounts, LedgerKind, LedgerRecord, LedgerUpdate, NewLedgerRecord, Profile,
};

/// Table holding records of one kind
fn table(kind: LedgerKind) -> &'static str {
    match kind {
        LedgerKind::Expense => "expenses",
        LedgerKind::Income => "incomes",
    }
}

fn row_to_record(kind: LedgerKind, row: &rusqlite::Row) -> rusqlite::Result<LedgerRecord> {
    let date_str: String = row.get(2)?;
    let created_at_str: String = row.get(7)?;
    Ok(LedgerRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind,
        date: parse_date_column(2, &date_str)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        import_hash: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Insert a ledger record (skips duplicates based on import_hash)
    ///
    /// Returns the new id, or `None` when a record with the same hash exists.
    pub fn insert_record(&self, user_id: &str, record: &NewLedgerRecord) -> Result<Option<i64>> {
        if !record.amount.is_finite() {
            return Err(Error::InvalidData(format!(
                "amount must be a finite number, got {}",
                record.amount
            )));
        }

        let conn = self.conn()?;
        let table = table(record.kind);

        let existing: Option<i64> = conn
            .query_row(
                &format!("SELECT id FROM {} WHERE import_hash = ?", table),
                params![record.import_hash],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            debug!(user_id, hash = %record.import_hash, "Skipping duplicate record");
            return Ok(None);
        }

        conn.execute(
            &format!(
                "INSERT INTO {} (user_id, date, amount, category, description, import_hash)
                 VALUES (?, ?, ?, ?, ?, ?)",
                table
            ),
            params![
                user_id,
                record.date.to_string(),
                record.amount.abs(),
                record.category_or_default(),
                record.description,
                record.import_hash,
            ],
        )?;

        Ok(Some(conn.last_insert_rowid()))
    }

    /// List a user's records of one kind in storage order
    ///
    /// `since` and `until` are inclusive bounds; `None` leaves that end open.
    pub fn list_records(
        &self,
        user_id: &str,
        kind: LedgerKind,
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<Vec<LedgerRecord>> {
        let conn = self.conn()?;
        let since = since.map(|d| d.to_string()).unwrap_or_default();
        // Stored dates are YYYY-MM-DD, so "9999-12-31" sorts after every one of them
        let until = until
            .map(|d| d.to_string())
            .unwrap_or_else(|| "9999-12-31".to_string());

        let mut stmt = conn.prepare(&format!(
            "SELECT id, user_id, date, amount, category, description, import_hash, created_at
             FROM {} WHERE user_id = ? AND date >= ? AND date <= ?
             ORDER BY id",
            table(kind)
        ))?;

        let records = stmt
            .query_map(params![user_id, since, until], |row| row_to_record(kind, row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Fetch one of a user's records by id
    pub fn get_record(&self, user_id: &str, kind: LedgerKind, id: i64) -> Result<LedgerRecord> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT id, user_id, date, amount, category, description, import_hash, created_at
                 FROM {} WHERE id = ? AND user_id = ?",
                table(kind)
            ),
            params![id, user_id],
            |row| row_to_record(kind, row),
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("{} {} for user {}", kind, id, user_id)))
    }

    /// Change fields of one of a user's records
    ///
    /// The import hash is left as is, so re-importing the original CSV row
    /// does not bring back the old values.
    pub fn update_record(
        &self,
        user_id: &str,
        kind: LedgerKind,
        id: i64,
        update: &LedgerUpdate,
    ) -> Result<LedgerRecord> {
        if update.is_empty() {
            return Err(Error::InvalidData("no fields to update".into()));
        }
        if let Some(amount) = update.amount.filter(|a| !a.is_finite()) {
            return Err(Error::InvalidData(format!(
                "amount must be a finite number, got {}",
                amount
            )));
        }
        let category = match update.category.as_deref().map(str::trim) {
            Some("") => return Err(Error::InvalidData("category must not be blank".into())),
            other => other,
        };

        let conn = self.conn()?;
        let updated = conn.execute(
            &format!(
                "UPDATE {} SET
                    date = COALESCE(?, date),
                    amount = COALESCE(?, amount),
                    category = COALESCE(?, category),
                    description = COALESCE(?, description)
                 WHERE id = ? AND user_id = ?",
                table(kind)
            ),
            params![
                update.date.map(|d| d.to_string()),
                update.amount.map(f64::abs),
                category,
                update.description,
                id,
                user_id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("{} {} for user {}", kind, id, user_id)));
        }
        debug!(user_id, %kind, id, "Updated record");

        self.get_record(user_id, kind, id)
    }

    /// Delete one of a user's records by id
    pub fn delete_record(&self, user_id: &str, kind: LedgerKind, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            &format!("DELETE FROM {} WHERE id = ? AND user_id = ?", table(kind)),
            params![id, user_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("{} {} for user {}", kind, id, user_id)));
        }
        Ok(())
    }

    /// Record counts and date span for a user
    pub fn ledger_counts(&self, user_id: &str) -> Result<LedgerCounts> {
        let conn = self.conn()?;

        let (expenses, incomes, first, last): (i64, i64, Option<String>, Option<String>) = conn
            .query_row(
                "SELECT
                    (SELECT COUNT(*) FROM expenses WHERE user_id = ?1),
                    (SELECT COUNT(*) FROM incomes WHERE user_id = ?1),
                    (SELECT MIN(date) FROM (
                        SELECT date FROM expenses WHERE user_id = ?1
                        UNION ALL SELECT date FROM incomes WHERE user_id = ?1)),
                    (SELECT MAX(date) FROM (
                        SELECT date FROM expenses WHERE user_id = ?1
                        UNION ALL SELECT date FROM incomes WHERE user_id = ?1))",
                params![user_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        let parse = |s: Option<String>| s.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

        Ok(LedgerCounts {
            expenses,
            incomes,
            first_date: parse(first),
            last_date: parse(last),
        })
    }
}

impl LedgerStore for Database {
    fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.get_profile(user_id)
    }

    fn fetch_expenses(
        &self,
        user_id: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<LedgerRecord>> {
        self.list_records(user_id, LedgerKind::Expense, Some(since), Some(until))
    }

    fn fetch_incomes(
        &self,
        user_id: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<LedgerRecord>> {
        self.list_records(user_id, LedgerKind::Income, Some(since), Some(until))
    }
}
