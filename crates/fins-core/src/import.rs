//! CSV import of expense and income records
//!
//! Expected header: `date,amount,category,description` (any order, case
//! insensitive; `category` and `description` are optional). Amounts are
//! stored as magnitudes, the record kind decides the sign later.

use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{LedgerKind, NewLedgerRecord};

/// Outcome of importing one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub parsed: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    amount: usize,
    category: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        Ok(Self {
            date: find("date").ok_or_else(|| Error::Import("Missing 'date' column".into()))?,
            amount: find("amount")
                .ok_or_else(|| Error::Import("Missing 'amount' column".into()))?,
            category: find("category"),
            description: find("description"),
        })
    }
}

/// Parse a ledger CSV into records for `user_id`
///
/// Identical rows within one file get distinct hashes (by occurrence), while
/// importing the same file twice yields the same hashes.
pub fn parse_ledger_csv<R: Read>(
    reader: R,
    user_id: &str,
    kind: LedgerKind,
) -> Result<Vec<NewLedgerRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut occurrences: HashMap<(NaiveDate, String, u64), u32> = HashMap::new();
    let mut records = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        // Header is line 1
        let line = i + 2;

        let field = |idx: Option<usize>| idx.and_then(|idx| row.get(idx)).unwrap_or("");

        let date = parse_date(field(Some(columns.date)))
            .map_err(|e| Error::Import(format!("line {}: {}", line, e)))?;
        let amount = parse_amount(field(Some(columns.amount)))
            .map_err(|e| Error::Import(format!("line {}: {}", line, e)))?
            .abs();
        let description = field(columns.description).to_string();
        let category = Some(field(columns.category).to_string()).filter(|c| !c.is_empty());

        let ordinal = occurrences
            .entry((date, description.clone(), amount.to_bits()))
            .or_insert(0);
        let import_hash = generate_hash(user_id, kind, &date, &description, amount, *ordinal);
        *ordinal += 1;

        records.push(NewLedgerRecord {
            kind,
            date,
            amount,
            category,
            description,
            import_hash,
        });
    }

    debug!(user_id, kind = kind.as_str(), rows = records.len(), "Parsed ledger CSV");
    Ok(records)
}

/// Parse and store a ledger CSV, skipping records already imported
pub fn import_ledger_csv<R: Read>(
    db: &Database,
    reader: R,
    user_id: &str,
    kind: LedgerKind,
) -> Result<ImportSummary> {
    let records = parse_ledger_csv(reader, user_id, kind)?;
    let mut summary = ImportSummary {
        parsed: records.len(),
        ..Default::default()
    };

    for record in &records {
        match db.insert_record(user_id, record)? {
            Some(_) => summary.inserted += 1,
            None => summary.duplicates += 1,
        }
    }

    info!(
        user_id,
        kind = kind.as_str(),
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        "Ledger import complete"
    );
    Ok(summary)
}

/// Build a manually entered record
///
/// The hash includes the entry time and a per-process sequence number, so
/// entering the same movement twice records it twice.
pub fn manual_record(
    user_id: &str,
    kind: LedgerKind,
    date: NaiveDate,
    amount: f64,
    category: Option<String>,
    description: &str,
) -> NewLedgerRecord {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);

    let mut hasher = Sha256::new();
    hasher.update(b"manual");
    hasher.update(Utc::now().to_rfc3339().as_bytes());
    hasher.update(SEQUENCE.fetch_add(1, Ordering::SeqCst).to_be_bytes());
    hasher.update(generate_hash(user_id, kind, &date, description, amount, 0).as_bytes());

    NewLedgerRecord {
        kind,
        date,
        amount: amount.abs(),
        category,
        description: description.to_string(),
        import_hash: hex::encode(hasher.finalize()),
    }
}

/// Generate a unique hash for deduplication
fn generate_hash(
    user_id: &str,
    kind: LedgerKind,
    date: &NaiveDate,
    description: &str,
    amount: f64,
    ordinal: u32,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(kind.as_str().as_bytes());
    hasher.update(date.to_string().as_bytes());
    hasher.update(description.as_bytes());
    hasher.update([0u8]);
    hasher.update(amount.to_be_bytes());
    hasher.update(ordinal.to_be_bytes());
    hex::encode(hasher.finalize())
}

/// Parse a date in one of the accepted formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2026-01-15
        "%m/%d/%y", // 01/15/26 (before %Y, which would read "26" as year 26)
        "%m/%d/%Y", // 01/15/2026
        "%d/%m/%Y", // 15/01/2026
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols, commas and parentheses
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}
