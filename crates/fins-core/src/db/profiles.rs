//! Profile operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Profile;

impl Database {
    /// Create or update a profile
    ///
    /// Fields passed as `None` keep their stored value.
    pub fn upsert_profile(
        &self,
        user_id: &str,
        current_balance: Option<f64>,
        salary: Option<f64>,
    ) -> Result<Profile> {
        if user_id.trim().is_empty() {
            return Err(Error::InvalidData("user id must not be empty".into()));
        }
        for (field, value) in [("balance", current_balance), ("salary", salary)] {
            if let Some(v) = value.filter(|v| !v.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "{} must be a finite number, got {}",
                    field, v
                )));
            }
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO profiles (user_id, current_balance, salary)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                current_balance = COALESCE(excluded.current_balance, profiles.current_balance),
                salary = COALESCE(excluded.salary, profiles.salary),
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![user_id, current_balance, salary],
        )?;
        drop(conn);

        self.get_profile(user_id)?
            .ok_or_else(|| Error::NotFound(format!("profile for {}", user_id)))
    }

    /// Get a profile by user id
    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let conn = self.conn()?;
        let profile = conn
            .query_row(
                "SELECT user_id, current_balance, salary, created_at, updated_at
                 FROM profiles WHERE user_id = ?",
                params![user_id],
                |row| {
                    let created_at: String = row.get(3)?;
                    let updated_at: String = row.get(4)?;
                    Ok(Profile {
                        user_id: row.get(0)?,
                        current_balance: row.get(1)?,
                        salary: row.get(2)?,
                        created_at: parse_datetime(&created_at),
                        updated_at: parse_datetime(&updated_at),
                    })
                },
            )
            .optional()?;

        Ok(profile)
    }

    /// Every user id that has a profile or ledger records
    pub fn list_users(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT user_id FROM profiles
             UNION SELECT user_id FROM expenses
             UNION SELECT user_id FROM incomes
             ORDER BY user_id",
        )?;

        let users = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(users)
    }
}
