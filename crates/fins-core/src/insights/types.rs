//! Result types produced by the analyzers

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Forecast of the balance indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePrediction {
    pub predicted_balance: f64,
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
    /// When the prediction was computed
    pub prediction_date: DateTime<Utc>,
    /// In-sample accuracy in [0, 1]
    pub model_accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsPrediction {
    pub monthly_savings_potential: f64,
    pub annual_savings_potential: f64,
    /// Monthly potential over salary (0 without a salary)
    pub savings_rate: f64,
    pub recommendations: Vec<String>,
}

/// Risk tier derived from the risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// High and critical tiers
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

/// Features the risk score is computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFeatureSet {
    /// Mean event amount
    pub average_flow: f64,
    /// Sample standard deviation of event amounts
    pub flow_volatility: f64,
    /// Share of calendar months with a negative net flow
    pub negative_month_frequency: f64,
    /// Lowest running balance
    pub min_balance: f64,
    /// Balance change per event
    pub balance_trend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub risk_level: RiskLevel,
    /// In [0, 100]
    pub risk_score: f64,
    /// In [0, 1]
    pub default_probability: f64,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Direction of the two most recent monthly expense totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseTrend {
    Growing,
    Shrinking,
    Stable,
}

impl ExpenseTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseTrend::Growing => "growing",
            ExpenseTrend::Shrinking => "shrinking",
            ExpenseTrend::Stable => "stable",
        }
    }
}

impl fmt::Display for ExpenseTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an expense was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusualReason {
    UnusuallyHighAmount,
}

impl UnusualReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnusualReason::UnusuallyHighAmount => "unusually_high_amount",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusualExpense {
    pub date: NaiveDate,
    /// Positive magnitude
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub reason: UnusualReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAnalysis {
    pub average_monthly_expenses: f64,
    /// Total outflow per category
    pub expense_categories: BTreeMap<String, f64>,
    pub expense_trend: ExpenseTrend,
    pub unusual_expenses: Vec<UnusualExpense>,
    pub budget_recommendations: Vec<String>,
}

/// Combined report over all four analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialInsights {
    pub user_id: String,
    pub balance_prediction: BalancePrediction,
    pub savings_prediction: SavingsPrediction,
    pub risk_analysis: RiskAnalysis,
    pub expense_analysis: ExpenseAnalysis,
    /// In [0, 100]
    pub overall_financial_score: f64,
    pub key_insights: Vec<String>,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Which analyses have enough data to be meaningful
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Readiness {
    pub balance_prediction: bool,
    pub savings_prediction: bool,
    pub risk_analysis: bool,
    pub expense_analysis: bool,
}

/// Data availability report for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSufficiency {
    pub user_id: String,
    pub data_available: bool,
    pub data_points: usize,
    pub date_range: Option<DateRange>,
    pub readiness: Readiness,
}
