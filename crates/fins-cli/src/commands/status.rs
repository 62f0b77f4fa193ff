//! Status command implementation

use std::path::Path;

use anyhow::Result;
use fins_core::db::{Database, DB_KEY_ENV};

use super::open_db;

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let has_key = std::env::var(DB_KEY_ENV).is_ok();

    println!();
    println!("📊 FINS Status");
    println!("   {}", "─".repeat(61));
    println!("   Database:   {}", db_path.display());

    let Ok(metadata) = std::fs::metadata(db_path) else {
        println!("   (not initialized, run `fins init`)");
        println!();
        return Ok(());
    };
    println!("   Size:       {:.1} KB", metadata.len() as f64 / 1024.0);

    let encryption = match (no_encrypt, has_key) {
        (true, _) => "⚠️  off (--no-encrypt)".to_string(),
        (false, true) => format!("🔒 on (key from {})", DB_KEY_ENV),
        (false, false) => format!("❌ required, {} not set", DB_KEY_ENV),
    };
    println!("   Encryption: {}", encryption);

    match open_db(db_path, no_encrypt) {
        Ok(db) => print_users(&db)?,
        Err(e) => {
            println!();
            println!("   ❌ Could not open database: {:#}", e);
            if has_key && !no_encrypt {
                println!("      Is {} the passphrase it was created with?", DB_KEY_ENV);
            }
        }
    }

    println!();
    Ok(())
}

/// Per-user record counts
pub fn print_users(db: &Database) -> Result<()> {
    let users = db.list_users()?;
    println!();
    println!("   Users: {}", users.len());

    for user in users {
        let counts = db.ledger_counts(&user)?;
        let span = match (counts.first_date, counts.last_date) {
            (Some(first), Some(last)) => format!("{} → {}", first, last),
            _ => "no records".to_string(),
        };
        println!(
            "     {:<16} {:>5} expenses  {:>5} incomes  {}",
            user, counts.expenses, counts.incomes, span
        );
    }
    Ok(())
}
