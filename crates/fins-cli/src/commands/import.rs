//! Import command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use fins_core::db::Database;
use fins_core::import::import_ledger_csv;
use fins_core::models::LedgerKind;

pub fn cmd_import(db: &Database, file: &Path, user: &str, kind: &str) -> Result<()> {
    let kind: LedgerKind = kind.parse().map_err(anyhow::Error::msg)?;

    println!("📥 Importing {} records from {}...", kind, file.display());

    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let summary = import_ledger_csv(db, reader, user, kind).context("Import failed")?;

    println!("   Parsed:     {}", summary.parsed);
    println!("   Imported:   {}", summary.inserted);
    if summary.duplicates > 0 {
        println!("   Duplicates: {} (skipped)", summary.duplicates);
    }
    println!("✅ Import complete for {}", user);
    Ok(())
}
