//! FINS Core Library
//!
//! Personal-finance analytics over a user's ledger of cash movements:
//! - Database access and migrations (profiles, expenses, incomes)
//! - CSV import of ledger records
//! - Ledger aggregation into a date-ordered cash-flow series
//! - Balance forecasting behind a pluggable forecaster
//! - Savings, risk and expense analyzers plus a combined health report
//! - TOML-configurable analytics constants

pub mod config;
pub mod db;
pub mod error;
pub mod forecast;
pub mod import;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod stats;

pub use config::AnalyticsConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use forecast::{Forecaster, HoltForecaster, MockForecaster};
pub use import::ImportSummary;
pub use insights::{
    BalancePrediction, DataSufficiency, ExpenseAnalysis, ExpenseTrend, FinancialInsights,
    InsightEngine, RiskAnalysis, RiskLevel, SavingsPrediction,
};
pub use ledger::{CashEvent, CashFlowSeries, LedgerStore};
