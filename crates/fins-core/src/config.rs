//! Analytics configuration
//!
//! All tunable constants of the analyzers (risk weights, tier thresholds,
//! savings fraction, outlier multiplier, forecaster parameters) live here so
//! they can be recalibrated without code changes.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the data dir
//!    (~/.local/share/fins/config/analytics.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub lookback_months: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { lookback_months: 12 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub default_months_ahead: u32,
    /// Longest horizon a caller may request
    pub max_months_ahead: u32,
    pub days_per_month: u32,
    pub alpha: f64,
    pub beta: f64,
    pub interval_z: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_months_ahead: 3,
            max_months_ahead: 120,
            days_per_month: 30,
            alpha: 0.3,
            beta: 0.1,
            interval_z: 1.2816,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsConfig {
    pub savings_fraction: f64,
    pub low_savings_rate: f64,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            savings_fraction: 0.2,
            low_savings_rate: 0.1,
        }
    }
}

/// Weights and thresholds of the additive risk score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub negative_average_flow: f64,
    pub high_volatility: f64,
    pub volatility_multiplier: f64,
    pub negative_month_frequency: f64,
    pub negative_balance: f64,
    pub downward_trend: f64,
    pub frequent_negative_months: f64,
    pub medium_threshold: f64,
    pub high_threshold: f64,
    pub critical_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            negative_average_flow: 30.0,
            high_volatility: 20.0,
            volatility_multiplier: 2.0,
            negative_month_frequency: 25.0,
            negative_balance: 25.0,
            downward_trend: 10.0,
            frequent_negative_months: 0.5,
            medium_threshold: 25.0,
            high_threshold: 50.0,
            critical_threshold: 75.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseConfig {
    pub unusual_std_devs: f64,
    pub category_share: f64,
}

impl Default for ExpenseConfig {
    fn default() -> Self {
        Self {
            unusual_std_devs: 2.0,
            category_share: 0.4,
        }
    }
}

/// Weights of the overall financial-health score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub risk_weight: f64,
    pub savings_weight: f64,
    pub shrinking_bonus: f64,
    pub stable_bonus: f64,
    pub growing_bonus: f64,
    pub accuracy_weight: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            risk_weight: 0.4,
            savings_weight: 0.3,
            shrinking_bonus: 20.0,
            stable_bonus: 10.0,
            growing_bonus: 0.0,
            accuracy_weight: 10.0,
        }
    }
}

/// Minimum ledger sizes reported as "ready" by the sufficiency check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub balance_prediction: usize,
    pub savings_prediction: usize,
    pub risk_analysis: usize,
    pub expense_outflows: usize,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            balance_prediction: 10,
            savings_prediction: 5,
            risk_analysis: 3,
            expense_outflows: 3,
        }
    }
}

/// Complete analytics configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub ledger: LedgerConfig,
    pub forecast: ForecastConfig,
    pub savings: SavingsConfig,
    pub risk: RiskConfig,
    pub expenses: ExpenseConfig,
    pub health: HealthConfig,
    pub readiness: ReadinessConfig,
}

impl AnalyticsConfig {
    /// Load from the default override location, else the embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (embedded defaults if the file is missing)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse TOML content layered over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    fn validate(&self) -> Result<()> {
        let f = &self.forecast;
        if !(f.alpha > 0.0 && f.alpha <= 1.0) || !(f.beta >= 0.0 && f.beta <= 1.0) {
            return Err(Error::Config(format!(
                "forecast smoothing factors out of range (alpha={}, beta={})",
                f.alpha, f.beta
            )));
        }
        if f.days_per_month == 0 || f.days_per_month > 31 {
            return Err(Error::Config(format!(
                "forecast days_per_month must be within 1..=31 (got {})",
                f.days_per_month
            )));
        }
        if f.default_months_ahead == 0 || f.default_months_ahead > f.max_months_ahead {
            return Err(Error::Config(format!(
                "forecast default_months_ahead must be within 1..={} (got {})",
                f.max_months_ahead, f.default_months_ahead
            )));
        }

        let r = &self.risk;
        let e = &self.expenses;
        let s = &self.savings;
        let h = &self.health;
        for (name, value) in [
            ("forecast.interval_z", f.interval_z),
            ("savings.savings_fraction", s.savings_fraction),
            ("savings.low_savings_rate", s.low_savings_rate),
            ("risk.negative_average_flow", r.negative_average_flow),
            ("risk.high_volatility", r.high_volatility),
            ("risk.volatility_multiplier", r.volatility_multiplier),
            ("risk.negative_month_frequency", r.negative_month_frequency),
            ("risk.negative_balance", r.negative_balance),
            ("risk.downward_trend", r.downward_trend),
            ("risk.frequent_negative_months", r.frequent_negative_months),
            ("risk.medium_threshold", r.medium_threshold),
            ("risk.high_threshold", r.high_threshold),
            ("risk.critical_threshold", r.critical_threshold),
            ("expenses.unusual_std_devs", e.unusual_std_devs),
            ("expenses.category_share", e.category_share),
            ("health.risk_weight", h.risk_weight),
            ("health.savings_weight", h.savings_weight),
            ("health.shrinking_bonus", h.shrinking_bonus),
            ("health.stable_bonus", h.stable_bonus),
            ("health.growing_bonus", h.growing_bonus),
            ("health.accuracy_weight", h.accuracy_weight),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Config(format!(
                    "{} must be a finite non-negative number (got {})",
                    name, value
                )));
            }
        }

        if !(r.medium_threshold <= r.high_threshold && r.high_threshold <= r.critical_threshold) {
            return Err(Error::Config(format!(
                "risk tier thresholds must be ascending ({} / {} / {})",
                r.medium_threshold, r.high_threshold, r.critical_threshold
            )));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fins").join("config").join("analytics.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalyticsConfig> {
    let candidate = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let content = match candidate {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading analytics config");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let config: AnalyticsConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
    config.validate()?;
    Ok(config)
}
