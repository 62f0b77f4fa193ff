//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `profiles` - Declared balance and salary per user
//! - `ledger` - Expense and income records, and the [`LedgerStore`] impl
//! - `summary` - Balance, salary and last-30-day totals
//!
//! [`LedgerStore`]: crate::ledger::LedgerStore

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};

mod ledger;
mod profiles;
mod summary;

pub use summary::SUMMARY_WINDOW_DAYS;


pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "FINS_DB_KEY";

/// Pooled connections per database
const POOL_SIZE: u32 = 8;

/// Hex SQLCipher key for a passphrase (Argon2id, fixed application salt)
///
/// The salt is fixed so a passphrase opens its database from any path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this invalidates every existing encrypted database
    const APP_SALT: &[u8; 16] = b"fins-salt-v1-fix";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("salt encoding: {}", e)))?;
    let digest = Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("key derivation: {}", e)))?
        .hash
        .ok_or_else(|| Error::Encryption("key derivation produced no output".into()))?;

    Ok(hex::encode(digest.as_bytes()))
}

/// Read a SQLite `CURRENT_TIMESTAMP` column, falling back to now
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored `YYYY-MM-DD` date column
pub(crate) fn parse_date_column(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Pooled handle on the ledger database
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open an encrypted database, keyed from `FINS_DB_KEY`
    ///
    /// Fails when the variable is unset. Use [`Database::new_unencrypted`]
    /// for local experiments.
    pub fn new(path: &str) -> Result<Self> {
        let passphrase = std::env::var(DB_KEY_ENV).map_err(|_| {
            Error::Encryption(format!(
                "{} is not set; export a passphrase or pass --no-encrypt",
                DB_KEY_ENV
            ))
        })?;
        Self::new_with_key(path, Some(&passphrase))
    }

    /// Open a plain SQLite database
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Open a database, applying the SQLCipher key on every pooled connection
    /// when a passphrase is given
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = match passphrase {
            Some(pass) => {
                let pragma = format!("PRAGMA key = 'x\"{}\"';", derive_key(pass)?);
                SqliteConnectionManager::file(path).with_init(move |conn| conn.execute_batch(&pragma))
            }
            None => SqliteConnectionManager::file(path),
        };

        let db = Self {
            pool: Pool::builder().max_size(POOL_SIZE).build(manager)?,
        };
        db.run_migrations()?;

        info!(path, encrypted = passphrase.is_some(), "Database opened");
        Ok(db)
    }

    /// Fresh unencrypted database in the temp dir, for tests
    ///
    /// Backed by a file since SQLCipher's `:memory:` mode does not share
    /// state across pooled connections.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT: AtomicU64 = AtomicU64::new(0);

        let file = std::env::temp_dir().join(format!(
            "fins_test_{}_{}.db",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        // Leftover from an earlier run with the same pid
        let _ = std::fs::remove_file(&file);

        Self::new_unencrypted(&file.to_string_lossy())
    }

    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- WAL: readers don't block writers (creates -wal and -shm sidecars)
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Declared financial profile, one per user
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                current_balance REAL,
                salary REAL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Outgoing cash movements (amount is a positive magnitude)
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                date DATE NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                import_hash TEXT UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses(user_id, date);

            -- Incoming cash movements
            CREATE TABLE IF NOT EXISTS incomes (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                date DATE NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL DEFAULT 'misc',
                description TEXT NOT NULL DEFAULT '',
                import_hash TEXT UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_incomes_user_date ON incomes(user_id, date);
            "#,
        )?;

        Ok(())
    }
}
