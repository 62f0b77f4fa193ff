//! Holt's linear exponential smoothing
//!
//! Smooths a level and a trend over the observed daily points. Observations
//! are not evenly spaced (days without events are absent), so projection
//! steps are measured in the average spacing between observations rather
//! than in raw days. The band is `z * sigma * sqrt(steps)` where sigma is
//! the RMS of the one-step-ahead in-sample residuals.

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::ledger::DailyPoint;

use super::{projected_date, ForecastOutput, ForecastPoint, Forecaster};

/// Double exponential smoothing forecaster
#[derive(Debug, Clone)]
pub struct HoltForecaster {
    /// Level smoothing factor (0, 1]
    alpha: f64,
    /// Trend smoothing factor [0, 1]
    beta: f64,
    /// Band half-width in residual standard deviations
    interval_z: f64,
}

impl HoltForecaster {
    pub fn new(alpha: f64, beta: f64, interval_z: f64) -> Self {
        Self {
            alpha,
            beta,
            interval_z,
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.alpha, config.beta, config.interval_z)
    }

    /// Average number of days between consecutive observations (at least 1)
    fn spacing_days(daily: &[DailyPoint]) -> f64 {
        match (daily.first(), daily.last()) {
            (Some(first), Some(last)) if daily.len() > 1 => {
                let span = (last.date - first.date).num_days() as f64;
                (span / (daily.len() - 1) as f64).max(1.0)
            }
            _ => 1.0,
        }
    }
}

impl Default for HoltForecaster {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl Forecaster for HoltForecaster {
    fn name(&self) -> &'static str {
        "holt"
    }

    fn fit_and_project(&self, daily: &[DailyPoint], horizon_days: u32) -> Result<ForecastOutput> {
        let first = daily
            .first()
            .ok_or_else(|| Error::Forecast("cannot fit an empty series".into()))?;
        let last_date = daily.last().map(|p| p.date).unwrap_or(first.date);

        let mut level = first.value;
        let mut trend = 0.0;
        let mut fitted = Vec::with_capacity(daily.len());
        fitted.push(first.value);

        let mut sum_sq = 0.0;
        for point in &daily[1..] {
            let one_step = level + trend;
            fitted.push(one_step);
            sum_sq += (point.value - one_step).powi(2);

            let new_level = self.alpha * point.value + (1.0 - self.alpha) * one_step;
            trend = self.beta * (new_level - level) + (1.0 - self.beta) * trend;
            level = new_level;
        }

        let sigma = if daily.len() > 1 {
            (sum_sq / (daily.len() - 1) as f64).sqrt()
        } else {
            0.0
        };
        let spacing = Self::spacing_days(daily);

        let points = (1..=horizon_days)
            .map(|day| {
                let steps = day as f64 / spacing;
                let value = level + trend * steps;
                let half_width = self.interval_z * sigma * steps.max(1.0).sqrt();
                Ok(ForecastPoint {
                    date: projected_date(last_date, day)?,
                    value,
                    lower: value - half_width,
                    upper: value + half_width,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastOutput { points, fitted })
    }
}
