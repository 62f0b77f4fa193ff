//! Balance forecasting
//!
//! The fitting itself is delegated to a [`Forecaster`]: any implementation
//! that fits a daily series and projects it forward with bounds will do.
//! This module owns what happens around it:
//! - resampling the ledger to one observation per calendar day
//! - sizing the horizon (`months_ahead * days_per_month`)
//! - picking the final projected point and its band
//! - scoring in-sample accuracy against the daily series
//!
//! Built-in forecasters:
//! - [`HoltForecaster`] - double exponential smoothing (default)
//! - [`MockForecaster`] - fixed output for tests

pub mod holt;
pub mod mock;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::insights::types::BalancePrediction;
use crate::ledger::{CashFlowSeries, DailyPoint};
use crate::stats::{mean, mean_absolute_error, ratio_or_zero};

pub use holt::HoltForecaster;
pub use mock::MockForecaster;

/// One projected day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Output of a fit-and-project call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastOutput {
    /// Projected days after the last observation, in date order
    pub points: Vec<ForecastPoint>,
    /// In-sample fitted values, aligned with the input series
    pub fitted: Vec<f64>,
}

/// A time-series forecasting capability
pub trait Forecaster: Send + Sync {
    /// Short identifier for logging
    fn name(&self) -> &'static str;

    /// Fit `daily` and project `horizon_days` days past its last date
    fn fit_and_project(&self, daily: &[DailyPoint], horizon_days: u32) -> Result<ForecastOutput>;
}

/// Forecast the balance indicator `months_ahead` months out
pub fn predict_balance(
    forecaster: &dyn Forecaster,
    series: &CashFlowSeries,
    months_ahead: u32,
    config: &ForecastConfig,
) -> Result<BalancePrediction> {
    if series.is_empty() {
        return Err(Error::InsufficientData(
            "no ledger events to forecast from".into(),
        ));
    }
    if months_ahead == 0 || months_ahead > config.max_months_ahead {
        return Err(Error::InvalidData(format!(
            "months_ahead must be within 1..={} (got {})",
            config.max_months_ahead, months_ahead
        )));
    }

    let daily = series.daily_totals();
    let horizon_days = months_ahead.saturating_mul(config.days_per_month);

    debug!(
        forecaster = forecaster.name(),
        observations = daily.len(),
        horizon_days,
        "Fitting forecast"
    );

    let output = forecaster
        .fit_and_project(&daily, horizon_days)
        .map_err(|e| {
            error!(forecaster = forecaster.name(), error = %e, "Forecaster failed");
            match e {
                Error::Forecast(_) => e,
                other => Error::Forecast(other.to_string()),
            }
        })?;

    let last = validate_output(&output, daily.len())?;
    let actual: Vec<f64> = daily.iter().map(|p| p.value).collect();

    Ok(BalancePrediction {
        predicted_balance: last.value,
        confidence_interval_lower: last.lower,
        confidence_interval_upper: last.upper,
        prediction_date: Utc::now(),
        model_accuracy: accuracy(&actual, &output.fitted),
    })
}

/// Date `days` after `start`, or a forecast error past the calendar's end
pub(crate) fn projected_date(start: NaiveDate, days: u32) -> Result<NaiveDate> {
    start
        .checked_add_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| Error::Forecast(format!("horizon of {} days from {} overflows", days, start)))
}

/// `max(0, 1 - MAE / mean(|actual|))`, or 0 when the actual series is all zeros
pub fn accuracy(actual: &[f64], fitted: &[f64]) -> f64 {
    let abs_actual: Vec<f64> = actual.iter().map(|v| v.abs()).collect();
    let scale = mean(&abs_actual);
    if scale == 0.0 {
        return 0.0;
    }
    let mae = mean_absolute_error(actual, fitted);
    (1.0 - ratio_or_zero(mae, scale)).clamp(0.0, 1.0)
}

fn validate_output(output: &ForecastOutput, observations: usize) -> Result<ForecastPoint> {
    if output.fitted.len() != observations {
        return Err(Error::Forecast(format!(
            "forecaster returned {} fitted values for {} observations",
            output.fitted.len(),
            observations
        )));
    }
    let last = output
        .points
        .last()
        .copied()
        .ok_or_else(|| Error::Forecast("forecaster returned no projected points".into()))?;

    let finite = [last.value, last.lower, last.upper]
        .iter()
        .chain(output.fitted.iter())
        .all(|v| v.is_finite());
    if !finite {
        return Err(Error::Forecast(
            "forecaster returned non-finite values".into(),
        ));
    }
    Ok(last)
}
