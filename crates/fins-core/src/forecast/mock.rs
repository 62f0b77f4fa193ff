//! Mock forecaster for testing
//!
//! Projects a constant value with a fixed band and echoes the input as the
//! fitted series, so accuracy is 1 unless the fitted values are overridden.

use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::ledger::DailyPoint;

use super::{projected_date, ForecastOutput, ForecastPoint, Forecaster};

/// Mock forecaster with predictable output
#[derive(Debug, Default)]
pub struct MockForecaster {
    /// Value of every projected point
    pub value: f64,
    /// Distance from the value to each bound
    pub half_width: f64,
    /// Fitted values to return instead of echoing the input
    pub fitted: Option<Vec<f64>>,
    /// When set, every call fails with this message
    pub failure: Option<String>,
    /// (observations, horizon_days) of the last call
    last_call: Mutex<Option<(usize, u32)>>,
}

impl MockForecaster {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// A forecaster that always fails
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn with_half_width(mut self, half_width: f64) -> Self {
        self.half_width = half_width;
        self
    }

    pub fn with_fitted(mut self, fitted: Vec<f64>) -> Self {
        self.fitted = Some(fitted);
        self
    }

    /// Horizon requested by the last call
    pub fn last_horizon(&self) -> Option<u32> {
        self.last_call().map(|(_, horizon)| horizon)
    }

    /// Number of daily observations passed to the last call
    pub fn last_observations(&self) -> Option<usize> {
        self.last_call().map(|(observations, _)| observations)
    }

    fn last_call(&self) -> Option<(usize, u32)> {
        self.last_call.lock().ok().and_then(|guard| *guard)
    }
}

impl Forecaster for MockForecaster {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn fit_and_project(&self, daily: &[DailyPoint], horizon_days: u32) -> Result<ForecastOutput> {
        if let Ok(mut guard) = self.last_call.lock() {
            *guard = Some((daily.len(), horizon_days));
        }

        if let Some(message) = &self.failure {
            return Err(Error::Forecast(message.clone()));
        }

        let start = daily
            .last()
            .map(|p| p.date)
            .ok_or_else(|| Error::Forecast("cannot fit an empty series".into()))?;

        let points = (1..=horizon_days)
            .map(|day| {
                Ok(ForecastPoint {
                    date: projected_date(start, day)?,
                    value: self.value,
                    lower: self.value - self.half_width,
                    upper: self.value + self.half_width,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let fitted = self
            .fitted
            .clone()
            .unwrap_or_else(|| daily.iter().map(|p| p.value).collect());

        Ok(ForecastOutput { points, fitted })
    }
}
