//! Integration tests for fins-core
//!
//! These tests exercise the full import → aggregate → analyze workflow
//! against a real (unencrypted, temp-file) database.

use chrono::NaiveDate;
use fins_core::{
    db::Database,
    import::{import_ledger_csv, manual_record},
    insights::{health, ExpenseTrend, RiskLevel},
    models::LedgerKind,
    AnalyticsConfig, Error, HoltForecaster, InsightEngine, MockForecaster,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Six months of salary, rent and rising grocery spend
fn income_csv() -> &'static str {
    r#"date,amount,category,description
2026-01-01,3000.00,salary,ACME PAYROLL
2026-02-01,3000.00,salary,ACME PAYROLL
2026-03-01,3000.00,salary,ACME PAYROLL
2026-04-01,3000.00,salary,ACME PAYROLL
2026-05-01,3000.00,salary,ACME PAYROLL
2026-06-01,3000.00,salary,ACME PAYROLL"#
}

fn expense_csv() -> &'static str {
    r#"date,amount,category,description
2026-01-02,1500.00,rent,LANDLORD
01/10/2026,($210.00),groceries,MARKET
2026-02-02,1500.00,rent,LANDLORD
02/10/2026,($240.00),groceries,MARKET
2026-03-02,1500.00,rent,LANDLORD
03/10/2026,($260.00),groceries,MARKET
2026-04-02,1500.00,rent,LANDLORD
04/10/2026,($280.00),groceries,MARKET
2026-05-02,1500.00,rent,LANDLORD
05/10/2026,($300.00),groceries,MARKET
2026-06-02,1500.00,rent,LANDLORD
06/10/2026,($330.00),groceries,MARKET"#
}

fn seeded_db() -> Database {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    db.upsert_profile("alice", Some(1000.0), Some(3000.0))
        .expect("Failed to create profile");
    import_ledger_csv(&db, income_csv().as_bytes(), "alice", LedgerKind::Income)
        .expect("Failed to import incomes");
    import_ledger_csv(&db, expense_csv().as_bytes(), "alice", LedgerKind::Expense)
        .expect("Failed to import expenses");
    db
}

fn engine(db: &Database) -> InsightEngine<'_> {
    InsightEngine::new(db, AnalyticsConfig::default()).with_as_of(date(2026, 6, 30))
}

// =============================================================================
// Single-month scenario
// =============================================================================

#[test]
fn test_single_month_balance_and_savings() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    db.upsert_profile("bob", Some(1000.0), None).unwrap();
    db.insert_record(
        "bob",
        &manual_record("bob", LedgerKind::Income, date(2026, 6, 5), 2000.0, None, "pay"),
    )
    .unwrap();
    db.insert_record(
        "bob",
        &manual_record("bob", LedgerKind::Expense, date(2026, 6, 7), 500.0, None, "rent"),
    )
    .unwrap();

    let engine = engine(&db);
    let snapshot = fins_core::ledger::load_snapshot(&db, "bob", 12, date(2026, 6, 30)).unwrap();
    assert_eq!(snapshot.series.final_balance(), 2500.0);

    let savings = engine.predict_savings("bob").unwrap();
    assert_eq!(savings.monthly_savings_potential, 300.0);
    assert_eq!(savings.annual_savings_potential, 3600.0);
    // No declared salary
    assert_eq!(savings.savings_rate, 0.0);
}

// =============================================================================
// Full workflow
// =============================================================================

#[test]
fn test_import_then_full_report() {
    let db = seeded_db();
    let report = engine(&db)
        .generate_financial_insights("alice")
        .expect("Failed to generate insights");

    assert_eq!(report.user_id, "alice");
    assert_eq!(report.expense_analysis.expense_categories.len(), 2);
    assert_eq!(report.expense_analysis.expense_categories["rent"], 9000.0);
    assert_eq!(report.expense_analysis.expense_trend, ExpenseTrend::Growing);
    assert!(report
        .key_insights
        .contains(&health::INSIGHT_GROWING_EXPENSES.to_string()));

    // Positive flow, balance never below zero
    assert_eq!(report.risk_analysis.risk_level, RiskLevel::Low);
    assert!((0.0..=100.0).contains(&report.overall_financial_score));

    let b = &report.balance_prediction;
    assert!(b.confidence_interval_lower <= b.predicted_balance);
    assert!(b.predicted_balance <= b.confidence_interval_upper);
    assert!((0.0..=1.0).contains(&b.model_accuracy));
}

#[test]
fn test_reimport_does_not_change_results() {
    let db = seeded_db();
    let before = engine(&db).analyze_expenses("alice").unwrap();

    let summary =
        import_ledger_csv(&db, expense_csv().as_bytes(), "alice", LedgerKind::Expense).unwrap();
    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.duplicates, 12);

    let after = engine(&db).analyze_expenses("alice").unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_holt_forecaster_end_to_end() {
    let db = seeded_db();
    let engine = engine(&db).with_forecaster(Box::new(HoltForecaster::default()));

    let short = engine.predict_balance("alice", 1).unwrap();
    let long = engine.predict_balance("alice", 6).unwrap();
    let short_width = short.confidence_interval_upper - short.confidence_interval_lower;
    let long_width = long.confidence_interval_upper - long.confidence_interval_lower;
    assert!(long_width >= short_width);
}

#[test]
fn test_data_sufficiency_after_import() {
    let db = seeded_db();
    let report = engine(&db).data_sufficiency("alice").unwrap();

    assert!(report.data_available);
    assert_eq!(report.data_points, 18);
    assert!(report.readiness.balance_prediction);
    assert!(report.readiness.savings_prediction);
    assert!(report.readiness.risk_analysis);
    assert!(report.readiness.expense_analysis);
}

// =============================================================================
// Boundaries
// =============================================================================

#[test]
fn test_unknown_user_is_insufficient_data() {
    let db = seeded_db();
    let engine = engine(&db);

    assert!(matches!(
        engine.analyze_risk("mallory"),
        Err(Error::InsufficientData(_))
    ));
    assert!(matches!(
        engine.analyze_expenses("mallory"),
        Err(Error::InsufficientData(_))
    ));
    assert!(matches!(
        engine.predict_savings("mallory"),
        Err(Error::InsufficientData(_))
    ));

    let report = engine.data_sufficiency("mallory").unwrap();
    assert!(!report.data_available);
    assert_eq!(report.data_points, 0);
}

#[test]
fn test_records_outside_lookback_are_ignored() {
    let db = seeded_db();
    // A 3-month lookback from June 30 starts on March 30
    let mut config = AnalyticsConfig::default();
    config.ledger.lookback_months = 3;
    let engine = InsightEngine::new(&db, config).with_as_of(date(2026, 6, 30));

    let report = engine.data_sufficiency("alice").unwrap();
    let range = report.date_range.unwrap();
    assert_eq!(range.start, date(2026, 4, 1));
    assert_eq!(range.end, date(2026, 6, 10));
}

#[test]
fn test_future_dated_records_are_ignored() {
    let db = seeded_db();
    let before = engine(&db).analyze_expenses("alice").unwrap();

    for day in [date(2026, 7, 1), date(2030, 1, 1)] {
        db.insert_record(
            "alice",
            &manual_record("alice", LedgerKind::Expense, day, 5000.0, Some("future".into()), "prepaid"),
        )
        .expect("Failed to insert future expense");
    }

    let after = engine(&db).analyze_expenses("alice").unwrap();
    assert_eq!(before, after);
    assert!(!after.expense_categories.contains_key("future"));

    let range = engine(&db).data_sufficiency("alice").unwrap().date_range.unwrap();
    assert_eq!(range.end, date(2026, 6, 10));
}

#[test]
fn test_excessive_horizon_is_invalid() {
    let db = seeded_db();
    let engine = engine(&db).with_forecaster(Box::new(HoltForecaster::default()));

    assert!(matches!(
        engine.predict_balance("alice", 3_200_000),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        engine.predict_balance("alice", u32::MAX),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_forecaster_failure_surfaces() {
    let db = seeded_db();
    let engine = engine(&db).with_forecaster(Box::new(MockForecaster::failing("did not converge")));

    let err = engine.generate_financial_insights("alice").unwrap_err();
    assert!(matches!(err, Error::Forecast(ref m) if m.contains("did not converge")));

    // Analyses that don't forecast are unaffected
    assert!(engine.analyze_risk("alice").is_ok());
}
