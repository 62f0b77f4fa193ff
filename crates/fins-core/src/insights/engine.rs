//! Insight Engine - the operation boundary over the analyzers
//!
//! Each operation fetches and aggregates the user's ledger afresh, runs the
//! relevant analyzer and maps failures: caller-facing errors pass through,
//! anything else is logged and reported as an internal error for that
//! operation.

use chrono::{Local, NaiveDate};
use tracing::{debug, error, warn};

use crate::config::AnalyticsConfig;
use crate::error::{Error, Result};
use crate::forecast::{self, Forecaster, HoltForecaster};
use crate::ledger::{self, LedgerSnapshot, LedgerStore};

use super::types::{
    BalancePrediction, DataSufficiency, DateRange, ExpenseAnalysis, FinancialInsights, Readiness,
    RiskAnalysis, SavingsPrediction,
};
use super::{expenses, health, risk, savings};

/// Runs the analyses for one user at a time
pub struct InsightEngine<'a> {
    store: &'a dyn LedgerStore,
    forecaster: Box<dyn Forecaster>,
    config: AnalyticsConfig,
    /// End of the lookback window
    as_of: NaiveDate,
}

impl<'a> InsightEngine<'a> {
    /// Create an engine with the Holt forecaster, analyzing up to today
    pub fn new(store: &'a dyn LedgerStore, config: AnalyticsConfig) -> Self {
        let forecaster = Box::new(HoltForecaster::from_config(&config.forecast));
        Self {
            store,
            forecaster,
            config,
            as_of: Local::now().date_naive(),
        }
    }

    /// Replace the forecasting capability
    pub fn with_forecaster(mut self, forecaster: Box<dyn Forecaster>) -> Self {
        self.forecaster = forecaster;
        self
    }

    /// Analyze as of a fixed date instead of today
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn predict_balance(&self, user_id: &str, months_ahead: u32) -> Result<BalancePrediction> {
        self.run("predict_balance", user_id, |snapshot| {
            forecast::predict_balance(
                self.forecaster.as_ref(),
                &snapshot.series,
                months_ahead,
                &self.config.forecast,
            )
        })
    }

    pub fn predict_savings(&self, user_id: &str) -> Result<SavingsPrediction> {
        self.run("predict_savings", user_id, |snapshot| {
            savings::predict_savings(&snapshot.series, snapshot.salary, &self.config.savings)
        })
    }

    pub fn analyze_risk(&self, user_id: &str) -> Result<RiskAnalysis> {
        self.run("analyze_risk", user_id, |snapshot| {
            risk::analyze_risk(&snapshot.series, &self.config.risk)
        })
    }

    pub fn analyze_expenses(&self, user_id: &str) -> Result<ExpenseAnalysis> {
        self.run("analyze_expenses", user_id, |snapshot| {
            expenses::analyze_expenses(&snapshot.series, &self.config.expenses)
        })
    }

    /// Run all four analyses over one snapshot and fuse them
    ///
    /// The balance forecast uses the configured default horizon. The first
    /// failing analysis aborts the whole report.
    pub fn generate_financial_insights(&self, user_id: &str) -> Result<FinancialInsights> {
        self.run("generate_financial_insights", user_id, |snapshot| {
            let config = &self.config;
            let series = &snapshot.series;

            let balance = forecast::predict_balance(
                self.forecaster.as_ref(),
                series,
                config.forecast.default_months_ahead,
                &config.forecast,
            )?;
            let savings = savings::predict_savings(series, snapshot.salary, &config.savings)?;
            let risk = risk::analyze_risk(series, &config.risk)?;
            let expenses = expenses::analyze_expenses(series, &config.expenses)?;

            let overall_financial_score =
                health::overall_score(&balance, &savings, &risk, &expenses, &config.health);
            let key_insights =
                health::key_insights(&balance, &savings, &risk, &expenses, &config.savings);
            let action_items = health::action_items(&savings, &risk, &expenses);

            Ok(FinancialInsights {
                user_id: snapshot.user_id.clone(),
                balance_prediction: balance,
                savings_prediction: savings,
                risk_analysis: risk,
                expense_analysis: expenses,
                overall_financial_score,
                key_insights,
                action_items,
            })
        })
    }

    /// Report how much data the user has and which analyses it supports
    pub fn data_sufficiency(&self, user_id: &str) -> Result<DataSufficiency> {
        self.run("data_sufficiency", user_id, |snapshot| {
            let series = &snapshot.series;
            let points = series.len();
            let thresholds = &self.config.readiness;

            Ok(DataSufficiency {
                user_id: snapshot.user_id.clone(),
                data_available: !series.is_empty(),
                data_points: points,
                date_range: series
                    .date_range()
                    .map(|(start, end)| DateRange { start, end }),
                readiness: Readiness {
                    balance_prediction: points >= thresholds.balance_prediction,
                    savings_prediction: points >= thresholds.savings_prediction,
                    risk_analysis: points >= thresholds.risk_analysis,
                    expense_analysis: series.outflows().len() >= thresholds.expense_outflows,
                },
            })
        })
    }

    fn run<T>(
        &self,
        operation: &'static str,
        user_id: &str,
        analyze: impl FnOnce(&LedgerSnapshot) -> Result<T>,
    ) -> Result<T> {
        debug!(operation, user_id, as_of = %self.as_of, "Running analysis");

        ledger::load_snapshot(
            self.store,
            user_id,
            self.config.ledger.lookback_months,
            self.as_of,
        )
        .and_then(|snapshot| analyze(&snapshot))
        .map_err(|e| boundary_error(operation, user_id, e))
    }
}

/// Map an error raised inside an operation to what the caller sees
fn boundary_error(operation: &'static str, user_id: &str, err: Error) -> Error {
    match err {
        Error::Forecast(ref message) => {
            error!(operation, user_id, error = %message, "Forecasting failed");
            err
        }
        e if e.is_caller_visible() => {
            warn!(operation, user_id, error = %e, "Analysis rejected");
            e
        }
        e => {
            error!(operation, user_id, error = %e, "Analysis failed");
            Error::Internal(operation.to_string())
        }
    }
}
