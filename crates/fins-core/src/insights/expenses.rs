//! Expense analysis: category totals, monthly trend and outliers

use std::collections::BTreeMap;

use crate::config::ExpenseConfig;
use crate::error::{Error, Result};
use crate::ledger::{CashFlowSeries, MonthKey, Outflow};
use crate::stats::{mean, sample_std_dev};

use super::types::{ExpenseAnalysis, ExpenseTrend, UnusualExpense, UnusualReason};

pub const REC_SET_LIMITS: &str = "Set monthly limits for each category";
pub const REC_MONITOR: &str = "Monitor your spending regularly";

/// Suggestion for the category that dominates monthly spending
pub fn reduce_category_recommendation(category: &str) -> String {
    format!("Consider reducing spending on {}", category)
}

/// Compare the two most recent monthly totals
pub fn classify_trend(monthly_totals: &[f64]) -> ExpenseTrend {
    match monthly_totals {
        [.., earlier, later] if later > earlier => ExpenseTrend::Growing,
        [.., earlier, later] if later < earlier => ExpenseTrend::Shrinking,
        _ => ExpenseTrend::Stable,
    }
}

/// Outflows strictly above `mean + k * stddev` of all outflow amounts
pub fn find_unusual(outflows: &[Outflow<'_>], std_devs: f64) -> Vec<UnusualExpense> {
    let amounts: Vec<f64> = outflows.iter().map(|o| o.amount).collect();
    let threshold = mean(&amounts) + std_devs * sample_std_dev(&amounts);

    outflows
        .iter()
        .filter(|o| o.amount > threshold)
        .map(|o| UnusualExpense {
            date: o.event.date,
            amount: o.amount,
            category: o.event.category.clone(),
            description: o.event.description.clone(),
            reason: UnusualReason::UnusuallyHighAmount,
        })
        .collect()
}

/// Largest category by total; ties go to the alphabetically first name
fn top_category(categories: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    categories
        .iter()
        .fold(None::<(&str, f64)>, |best, (name, total)| match best {
            Some((_, best_total)) if *total <= best_total => best,
            _ => Some((name.as_str(), *total)),
        })
}

pub fn analyze_expenses(series: &CashFlowSeries, config: &ExpenseConfig) -> Result<ExpenseAnalysis> {
    if series.is_empty() {
        return Err(Error::InsufficientData(
            "no ledger events to analyze expenses from".into(),
        ));
    }

    let outflows = series.outflows();

    let mut by_month: BTreeMap<MonthKey, f64> = BTreeMap::new();
    let mut categories: BTreeMap<String, f64> = BTreeMap::new();
    for o in &outflows {
        *by_month.entry(o.event.month()).or_insert(0.0) += o.amount;
        *categories.entry(o.event.category.clone()).or_insert(0.0) += o.amount;
    }

    let monthly_totals: Vec<f64> = by_month.into_values().collect();
    let average_monthly = mean(&monthly_totals);

    let mut budget_recommendations = Vec::new();
    if let Some((category, total)) = top_category(&categories) {
        if total > config.category_share * average_monthly {
            budget_recommendations.push(reduce_category_recommendation(category));
        }
    }
    budget_recommendations.push(REC_SET_LIMITS.to_string());
    budget_recommendations.push(REC_MONITOR.to_string());

    let unusual_expenses = find_unusual(&outflows, config.unusual_std_devs);

    tracing::debug!(
        outflows = outflows.len(),
        months = monthly_totals.len(),
        unusual = unusual_expenses.len(),
        "Expenses analyzed"
    );

    Ok(ExpenseAnalysis {
        average_monthly_expenses: average_monthly,
        expense_categories: categories,
        expense_trend: classify_trend(&monthly_totals),
        unusual_expenses,
        budget_recommendations,
    })
}
