//! Delinquency risk scoring
//!
//! A hand-tuned additive score over five features of the event-level series.
//! Each rule adds its configured weight; the sum is clamped to [0, 100] and
//! mapped onto four tiers.

use crate::config::RiskConfig;
use crate::error::{Error, Result};
use crate::ledger::CashFlowSeries;
use crate::stats::{mean, ratio_or_zero, sample_std_dev};

use super::types::{RiskAnalysis, RiskFeatureSet, RiskLevel};

pub const FACTOR_NEGATIVE_FLOW: &str = "Negative average cash flow";
pub const FACTOR_HIGH_VOLATILITY: &str = "High cash flow volatility";
pub const FACTOR_NEGATIVE_MONTHS: &str = "Frequent months with negative net flow";
pub const FACTOR_NEGATIVE_BALANCE: &str = "Balance dropped below zero";
pub const FACTOR_DOWNWARD_TREND: &str = "Balance is trending downward";

pub const REC_CUT_EXPENSES: &str = "Cut non-essential expenses";
pub const REC_MORE_INCOME: &str = "Look for additional sources of income";
pub const REC_STABILIZE: &str = "Stabilize your monthly spending";
pub const REC_EMERGENCY_FUND: &str = "Build an emergency fund";
pub const REC_ADVICE: &str = "Consider seeking professional financial advice";
pub const REC_PAY_DEBT: &str = "Prioritize paying down debt";

/// Derive the scoring features from a non-empty series
pub fn compute_features(series: &CashFlowSeries) -> RiskFeatureSet {
    let amounts = series.amounts();

    let months = series.monthly_net_flows();
    let negative_months = months.values().filter(|v| **v < 0.0).count();
    let negative_month_frequency = ratio_or_zero(negative_months as f64, months.len() as f64);

    let balances = series.balances();
    let balance_trend = match (balances.first(), balances.last()) {
        (Some(first), Some(last)) if balances.len() >= 2 => (last - first) / balances.len() as f64,
        _ => 0.0,
    };

    RiskFeatureSet {
        average_flow: mean(&amounts),
        flow_volatility: sample_std_dev(&amounts),
        negative_month_frequency,
        min_balance: series.min_balance().unwrap_or(series.starting_balance()),
        balance_trend,
    }
}

fn is_volatile(features: &RiskFeatureSet, config: &RiskConfig) -> bool {
    features.flow_volatility > config.volatility_multiplier * features.average_flow.abs()
}

/// Additive score in [0, 100]
pub fn score(features: &RiskFeatureSet, config: &RiskConfig) -> f64 {
    let mut score = 0.0;
    if features.average_flow < 0.0 {
        score += config.negative_average_flow;
    }
    if is_volatile(features, config) {
        score += config.high_volatility;
    }
    score += features.negative_month_frequency * config.negative_month_frequency;
    if features.min_balance < 0.0 {
        score += config.negative_balance;
    }
    if features.balance_trend < 0.0 {
        score += config.downward_trend;
    }
    score.clamp(0.0, 100.0)
}

/// Map a score onto its tier (lower bounds are inclusive)
pub fn risk_level_for(score: f64, config: &RiskConfig) -> RiskLevel {
    if score < config.medium_threshold {
        RiskLevel::Low
    } else if score < config.high_threshold {
        RiskLevel::Medium
    } else if score < config.critical_threshold {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

fn risk_factors(features: &RiskFeatureSet, config: &RiskConfig) -> Vec<String> {
    let mut factors = Vec::new();
    if features.average_flow < 0.0 {
        factors.push(FACTOR_NEGATIVE_FLOW);
    }
    if is_volatile(features, config) {
        factors.push(FACTOR_HIGH_VOLATILITY);
    }
    if features.negative_month_frequency > config.frequent_negative_months {
        factors.push(FACTOR_NEGATIVE_MONTHS);
    }
    if features.min_balance < 0.0 {
        factors.push(FACTOR_NEGATIVE_BALANCE);
    }
    if features.balance_trend < 0.0 {
        factors.push(FACTOR_DOWNWARD_TREND);
    }
    factors.into_iter().map(String::from).collect()
}

fn recommendations(features: &RiskFeatureSet, level: RiskLevel, config: &RiskConfig) -> Vec<String> {
    let mut recs = Vec::new();
    if features.average_flow < 0.0 {
        recs.extend([REC_CUT_EXPENSES, REC_MORE_INCOME]);
    }
    if is_volatile(features, config) {
        recs.extend([REC_STABILIZE, REC_EMERGENCY_FUND]);
    }
    if level.is_elevated() {
        recs.extend([REC_ADVICE, REC_PAY_DEBT]);
    }
    recs.into_iter().map(String::from).collect()
}

/// Score the series and explain the result
pub fn analyze_risk(series: &CashFlowSeries, config: &RiskConfig) -> Result<RiskAnalysis> {
    if series.is_empty() {
        return Err(Error::InsufficientData(
            "no ledger events to assess risk from".into(),
        ));
    }

    let features = compute_features(series);
    let risk_score = score(&features, config);
    let risk_level = risk_level_for(risk_score, config);

    tracing::debug!(
        risk_score,
        risk_level = risk_level.as_str(),
        average_flow = features.average_flow,
        volatility = features.flow_volatility,
        "Risk scored"
    );

    Ok(RiskAnalysis {
        risk_level,
        risk_score,
        default_probability: risk_score / 100.0,
        risk_factors: risk_factors(&features, config),
        recommendations: recommendations(&features, risk_level, config),
    })
}
