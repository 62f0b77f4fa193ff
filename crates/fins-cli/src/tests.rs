//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use chrono::NaiveDate;
use clap::Parser;
use fins_core::db::Database;
use fins_core::models::LedgerKind;
use fins_core::{AnalyticsConfig, InsightEngine, MockForecaster};

use crate::cli::{Cli, Commands, PredictAction, RecordAction};
use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.upsert_profile("alice", Some(1000.0), Some(3000.0)).unwrap();
    db
}

/// Insert a record directly, bypassing the manual-entry hash
fn add_record(db: &Database, kind: LedgerKind, date: &str, amount: f64, category: &str) {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let table = match kind {
        LedgerKind::Expense => "expenses",
        LedgerKind::Income => "incomes",
    };
    let conn = db.conn().unwrap();
    conn.execute(
        &format!(
            "INSERT INTO {} (user_id, date, amount, category, import_hash) VALUES ('alice', ?1, ?2, ?3, ?4)",
            table
        ),
        rusqlite::params![
            date,
            amount,
            category,
            format!("test_{}", COUNTER.fetch_add(1, Ordering::SeqCst))
        ],
    )
    .unwrap();
}

fn seeded_db() -> Database {
    let db = setup_test_db();
    for month in 1..=4 {
        add_record(&db, LedgerKind::Income, &format!("2026-0{}-01", month), 3000.0, "salary");
        add_record(&db, LedgerKind::Expense, &format!("2026-0{}-03", month), 1200.0, "rent");
        add_record(&db, LedgerKind::Expense, &format!("2026-0{}-12", month), 150.0, "food");
    }
    db
}

fn engine(db: &Database) -> InsightEngine<'_> {
    InsightEngine::new(db, AnalyticsConfig::default())
        .with_forecaster(Box::new(MockForecaster::new(2500.0).with_half_width(250.0)))
        .with_as_of(NaiveDate::from_ymd_opt(2026, 4, 30).unwrap())
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_predict_balance() {
    let cli = Cli::try_parse_from([
        "fins", "--no-encrypt", "predict", "balance", "--user", "alice", "--months", "6",
    ])
    .unwrap();
    assert!(cli.no_encrypt);
    match cli.command {
        Commands::Predict {
            action: PredictAction::Balance { user, months, json },
        } => {
            assert_eq!(user, "alice");
            assert_eq!(months, Some(6));
            assert!(!json);
        }
        _ => panic!("expected predict balance"),
    }
}

#[test]
fn test_parse_expense_add_negative_amount() {
    let cli = Cli::try_parse_from([
        "fins", "expense", "add", "--user", "alice", "--amount", "-12.5", "--category", "food",
    ])
    .unwrap();
    match cli.command {
        Commands::Expense {
            action: RecordAction::Add { amount, category, .. },
        } => {
            assert_eq!(amount, -12.5);
            assert_eq!(category.as_deref(), Some("food"));
        }
        _ => panic!("expected expense add"),
    }
}

#[test]
fn test_parse_requires_user() {
    assert!(Cli::try_parse_from(["fins", "risk"]).is_err());
}

// ========== Profile Command Tests ==========

#[test]
fn test_cmd_profile_set_and_show() {
    let db = Database::in_memory().unwrap();
    commands::cmd_profile_set(&db, "bob", Some(250.0), None).unwrap();
    commands::cmd_profile_set(&db, "bob", None, Some(1800.0)).unwrap();

    let profile = db.get_profile("bob").unwrap().unwrap();
    assert_eq!(profile.current_balance, Some(250.0));
    assert_eq!(profile.salary, Some(1800.0));

    assert!(commands::cmd_profile_show(&db, "bob").is_ok());
    assert!(commands::cmd_profile_show(&db, "nobody").is_ok());
}

// ========== Ledger Command Tests ==========

#[test]
fn test_cmd_record_add_and_delete() {
    let db = setup_test_db();
    commands::cmd_record_add(
        &db,
        LedgerKind::Expense,
        "alice",
        -42.0,
        Some("2026-03-05"),
        Some("food".into()),
        "groceries",
    )
    .unwrap();

    let records = db.list_records("alice", LedgerKind::Expense, None, None).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, 42.0);

    commands::cmd_record(
        &db,
        LedgerKind::Expense,
        RecordAction::Delete {
            user: "alice".into(),
            id: records[0].id,
        },
    )
    .unwrap();
    assert!(db
        .list_records("alice", LedgerKind::Expense, None, None)
        .unwrap()
        .is_empty());
}

#[test]
fn test_cmd_record_delete_other_users_record_fails() {
    let db = setup_test_db();
    add_record(&db, LedgerKind::Expense, "2026-03-05", 42.0, "food");
    let id = db.list_records("alice", LedgerKind::Expense, None, None).unwrap()[0].id;

    let err = commands::cmd_record_delete(&db, LedgerKind::Expense, "bob", id).unwrap_err();
    assert!(err.to_string().contains("Failed to delete expense"));
    assert_eq!(db.list_records("alice", LedgerKind::Expense, None, None).unwrap().len(), 1);
}

#[test]
fn test_cmd_record_edit() {
    let db = setup_test_db();
    add_record(&db, LedgerKind::Income, "2026-03-01", 3000.0, "salary");
    let id = db.list_records("alice", LedgerKind::Income, None, None).unwrap()[0].id;

    commands::cmd_record(
        &db,
        LedgerKind::Income,
        RecordAction::Edit {
            user: "alice".into(),
            id,
            amount: Some(3200.0),
            date: Some("03/02/2026".into()),
            category: None,
            description: Some("March pay".into()),
        },
    )
    .unwrap();

    let record = db.get_record("alice", LedgerKind::Income, id).unwrap();
    assert_eq!(record.amount, 3200.0);
    assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    assert_eq!(record.category, "salary");
    assert_eq!(record.description, "March pay");

    // Bad date is rejected before touching the record
    let result = commands::cmd_record(
        &db,
        LedgerKind::Income,
        RecordAction::Edit {
            user: "alice".into(),
            id,
            amount: Some(1.0),
            date: Some("someday".into()),
            category: None,
            description: None,
        },
    );
    assert!(result.is_err());
    assert_eq!(db.get_record("alice", LedgerKind::Income, id).unwrap().amount, 3200.0);
}

#[test]
fn test_parse_delete_requires_user() {
    assert!(Cli::try_parse_from(["fins", "expense", "delete", "7"]).is_err());
    let cli = Cli::try_parse_from(["fins", "expense", "delete", "--user", "alice", "7"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Expense {
            action: RecordAction::Delete { id: 7, .. }
        }
    ));
}

#[test]
fn test_cmd_summary() {
    let db = setup_test_db();
    let today = chrono::Local::now().date_naive().to_string();
    add_record(&db, LedgerKind::Expense, &today, 80.0, "food");
    add_record(&db, LedgerKind::Income, &today, 500.0, "misc");

    assert!(commands::cmd_summary(&db, "alice", false).is_ok());
    assert!(commands::cmd_summary(&db, "alice", true).is_ok());

    let err = commands::cmd_summary(&db, "nobody", false).unwrap_err();
    assert!(err.to_string().contains("Summary failed for nobody"));
}

#[test]
fn test_cmd_record_add_invalid_date() {
    let db = setup_test_db();
    let result = commands::cmd_record_add(
        &db,
        LedgerKind::Income,
        "alice",
        10.0,
        Some("not-a-date"),
        None,
        "",
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_ledger_empty_and_populated() {
    let db = setup_test_db();
    let config = AnalyticsConfig::default();
    assert!(commands::cmd_ledger(&db, "alice", 10, &config).is_ok());

    let today = chrono::Local::now().date_naive().to_string();
    add_record(&db, LedgerKind::Expense, &today, 12.0, "coffee");
    assert!(commands::cmd_ledger(&db, "alice", 10, &config).is_ok());
}

// ========== Import Command Tests ==========

#[test]
fn test_cmd_import() {
    let db = setup_test_db();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "date,amount,category,description").unwrap();
    writeln!(file, "2026-02-01,3000,salary,PAYROLL").unwrap();
    writeln!(file, "2026-03-01,3000,salary,PAYROLL").unwrap();

    commands::cmd_import(&db, file.path(), "alice", "income").unwrap();
    assert_eq!(db.ledger_counts("alice").unwrap().incomes, 2);

    // Re-import is a no-op
    commands::cmd_import(&db, file.path(), "alice", "income").unwrap();
    assert_eq!(db.ledger_counts("alice").unwrap().incomes, 2);
}

#[test]
fn test_cmd_import_bad_kind() {
    let db = setup_test_db();
    let file = tempfile::NamedTempFile::new().unwrap();
    let err = commands::cmd_import(&db, file.path(), "alice", "transfer").unwrap_err();
    assert!(err.to_string().contains("Unknown ledger kind"));
}

// ========== Analysis Command Tests ==========

#[test]
fn test_analysis_commands_text_and_json() {
    let db = seeded_db();
    let engine = engine(&db);

    for json in [false, true] {
        commands::cmd_predict_balance(&engine, "alice", Some(2), json).unwrap();
        commands::cmd_predict_savings(&engine, "alice", json).unwrap();
        commands::cmd_risk(&engine, "alice", json).unwrap();
        commands::cmd_expenses(&engine, "alice", json).unwrap();
        commands::cmd_insights(&engine, "alice", json).unwrap();
        commands::cmd_health(&engine, "alice", json).unwrap();
    }
}

#[test]
fn test_predict_balance_rejects_excessive_horizon() {
    let db = seeded_db();
    let engine = engine(&db);

    let err = commands::cmd_predict_balance(&engine, "alice", Some(3_200_000), false).unwrap_err();
    assert!(err.to_string().contains("Balance forecast failed for alice"));
}

#[test]
fn test_cmd_profile_set_rejects_infinite_balance() {
    let db = Database::in_memory().unwrap();
    assert!(commands::cmd_profile_set(&db, "bob", Some(f64::INFINITY), None).is_err());
}

#[test]
fn test_analysis_without_data_fails_with_context() {
    let db = setup_test_db();
    let engine = engine(&db);

    let err = commands::cmd_risk(&engine, "alice", false).unwrap_err();
    assert!(err.to_string().contains("Risk analysis failed for alice"));

    // The sufficiency report still works on an empty ledger
    assert!(commands::cmd_health(&engine, "alice", false).is_ok());
}

#[test]
fn test_load_config_missing_file_uses_defaults() {
    let config =
        commands::load_config(Some(std::path::Path::new("/nonexistent/analytics.toml"))).unwrap();
    assert_eq!(config, AnalyticsConfig::default());
}

// ========== Status Command Tests ==========

#[test]
fn test_cmd_status_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");
    assert!(commands::cmd_status(&path, true).is_ok());
    assert!(!path.exists());
}

#[test]
fn test_cmd_status_lists_users() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fins.db");
    let db = commands::open_db(&path, true).unwrap();
    db.upsert_profile("alice", Some(10.0), None).unwrap();

    assert!(commands::cmd_status(&path, true).is_ok());
    assert!(commands::print_users(&db).is_ok());
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("groceries", 20), "groceries");
    assert_eq!(truncate("a very long description", 10), "a very ...");
    assert_eq!(truncate("café au lait", 7), "café...");
}

#[test]
fn test_parse_date_arg() {
    assert_eq!(
        commands::parse_date_arg(Some("03/15/2026")).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    );
    assert_eq!(
        commands::parse_date_arg(None).unwrap(),
        chrono::Local::now().date_naive()
    );
    assert!(commands::parse_date_arg(Some("yesterday")).is_err());
}
