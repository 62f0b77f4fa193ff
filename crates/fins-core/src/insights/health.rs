//! Financial-health summary built from the four analyses

use std::collections::HashSet;

use crate::config::{HealthConfig, SavingsConfig};

use super::types::{
    BalancePrediction, ExpenseAnalysis, ExpenseTrend, RiskAnalysis, SavingsPrediction,
};

pub const INSIGHT_SIGNIFICANT_RISK: &str = "Your financial profile shows significant risk";
pub const INSIGHT_LOW_SAVINGS: &str = "Your savings capacity is below the recommended level";
pub const INSIGHT_GROWING_EXPENSES: &str = "Your expenses are growing";
pub const INSIGHT_NEGATIVE_FORECAST: &str =
    "The forecast indicates a negative balance in the coming months";

/// Recommendations taken from each analysis into the action list
const ACTIONS_PER_SOURCE: usize = 2;

/// Weighted score in [0, 100]
pub fn overall_score(
    balance: &BalancePrediction,
    savings: &SavingsPrediction,
    risk: &RiskAnalysis,
    expenses: &ExpenseAnalysis,
    config: &HealthConfig,
) -> f64 {
    let trend_bonus = match expenses.expense_trend {
        ExpenseTrend::Shrinking => config.shrinking_bonus,
        ExpenseTrend::Stable => config.stable_bonus,
        ExpenseTrend::Growing => config.growing_bonus,
    };

    let score = (100.0 - risk.risk_score) * config.risk_weight
        + (savings.savings_rate * 100.0).min(100.0) * config.savings_weight
        + trend_bonus
        + balance.model_accuracy * config.accuracy_weight;

    score.clamp(0.0, 100.0)
}

pub fn key_insights(
    balance: &BalancePrediction,
    savings: &SavingsPrediction,
    risk: &RiskAnalysis,
    expenses: &ExpenseAnalysis,
    savings_config: &SavingsConfig,
) -> Vec<String> {
    let mut insights = Vec::new();
    if risk.risk_level.is_elevated() {
        insights.push(INSIGHT_SIGNIFICANT_RISK);
    }
    if savings.savings_rate < savings_config.low_savings_rate {
        insights.push(INSIGHT_LOW_SAVINGS);
    }
    if expenses.expense_trend == ExpenseTrend::Growing {
        insights.push(INSIGHT_GROWING_EXPENSES);
    }
    if balance.predicted_balance < 0.0 {
        insights.push(INSIGHT_NEGATIVE_FORECAST);
    }
    insights.into_iter().map(String::from).collect()
}

/// First recommendations of risk, savings and budget, without duplicates
pub fn action_items(
    savings: &SavingsPrediction,
    risk: &RiskAnalysis,
    expenses: &ExpenseAnalysis,
) -> Vec<String> {
    let mut seen = HashSet::new();
    [
        &risk.recommendations,
        &savings.recommendations,
        &expenses.budget_recommendations,
    ]
    .into_iter()
    .flat_map(|recs| recs.iter().take(ACTIONS_PER_SOURCE))
    .filter(|rec| seen.insert(rec.as_str()))
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::RiskLevel;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn balance(predicted: f64, accuracy: f64) -> BalancePrediction {
        BalancePrediction {
            predicted_balance: predicted,
            confidence_interval_lower: predicted - 1.0,
            confidence_interval_upper: predicted + 1.0,
            prediction_date: Utc::now(),
            model_accuracy: accuracy,
        }
    }

    fn savings(rate: f64, recs: &[&str]) -> SavingsPrediction {
        SavingsPrediction {
            monthly_savings_potential: 0.0,
            annual_savings_potential: 0.0,
            savings_rate: rate,
            recommendations: recs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn risk(score: f64, level: RiskLevel, recs: &[&str]) -> RiskAnalysis {
        RiskAnalysis {
            risk_level: level,
            risk_score: score,
            default_probability: score / 100.0,
            risk_factors: vec![],
            recommendations: recs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn expenses(trend: ExpenseTrend, recs: &[&str]) -> ExpenseAnalysis {
        ExpenseAnalysis {
            average_monthly_expenses: 0.0,
            expense_categories: BTreeMap::new(),
            expense_trend: trend,
            unusual_expenses: vec![],
            budget_recommendations: recs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_overall_score_formula() {
        let score = overall_score(
            &balance(100.0, 0.5),
            &savings(0.2, &[]),
            &risk(30.0, RiskLevel::Medium, &[]),
            &expenses(ExpenseTrend::Stable, &[]),
            &HealthConfig::default(),
        );
        // 70 * 0.4 + 20 * 0.3 + 10 + 0.5 * 10
        assert!((score - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_score_caps_at_100() {
        let score = overall_score(
            &balance(100.0, 1.0),
            &savings(5.0, &[]),
            &risk(0.0, RiskLevel::Low, &[]),
            &expenses(ExpenseTrend::Shrinking, &[]),
            &HealthConfig::default(),
        );
        // 40 + 30 + 20 + 10
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_key_insights_order() {
        let insights = key_insights(
            &balance(-10.0, 0.0),
            &savings(0.0, &[]),
            &risk(80.0, RiskLevel::Critical, &[]),
            &expenses(ExpenseTrend::Growing, &[]),
            &SavingsConfig::default(),
        );
        assert_eq!(
            insights,
            vec![
                INSIGHT_SIGNIFICANT_RISK,
                INSIGHT_LOW_SAVINGS,
                INSIGHT_GROWING_EXPENSES,
                INSIGHT_NEGATIVE_FORECAST,
            ]
        );

        let none = key_insights(
            &balance(10.0, 0.0),
            &savings(0.5, &[]),
            &risk(10.0, RiskLevel::Low, &[]),
            &expenses(ExpenseTrend::Shrinking, &[]),
            &SavingsConfig::default(),
        );
        assert!(none.is_empty());
    }

    #[test]
    fn test_action_items_take_two_and_dedupe() {
        let actions = action_items(
            &savings(0.0, &["budget", "cut", "unused"]),
            &risk(60.0, RiskLevel::High, &["cut", "advice", "debt"]),
            &expenses(ExpenseTrend::Stable, &["limits", "monitor", "budget"]),
        );
        assert_eq!(actions, vec!["cut", "advice", "budget", "limits", "monitor"]);
    }
}
