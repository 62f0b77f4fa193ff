//! Financial insights
//!
//! Four analyzers turn a user's cash-flow series into derived artifacts, and
//! the health summary fuses them:
//!
//! - **Savings** - monthly and annual savings potential, savings rate
//! - **Risk** - additive delinquency score, tier, factors
//! - **Expenses** - category totals, monthly trend, unusual outflows
//! - **Health** - overall score, key insights, action items
//!
//! The balance forecast lives in [`crate::forecast`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fins_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new(&db, AnalyticsConfig::load()?);
//! let report = engine.generate_financial_insights("alice")?;
//! ```

pub mod engine;
pub mod expenses;
pub mod health;
pub mod risk;
pub mod savings;
pub mod types;

pub use engine::InsightEngine;
pub use types::{
    BalancePrediction, DataSufficiency, DateRange, ExpenseAnalysis, ExpenseTrend,
    FinancialInsights, Readiness, RiskAnalysis, RiskFeatureSet, RiskLevel, SavingsPrediction,
    UnusualExpense, UnusualReason,
};
