//! Analysis command implementations
//!
//! Each command prints a text report, or pretty JSON with `--json`.

use anyhow::{Context, Result};
use fins_core::insights::{
    BalancePrediction, DataSufficiency, ExpenseAnalysis, FinancialInsights, RiskAnalysis,
    RiskLevel, SavingsPrediction,
};
use fins_core::InsightEngine;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("   {}:", title);
    for item in items {
        println!("     • {}", item);
    }
}

fn risk_icon(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "🟢",
        RiskLevel::Medium => "🟡",
        RiskLevel::High => "🟠",
        RiskLevel::Critical => "🔴",
    }
}

pub fn cmd_predict_balance(
    engine: &InsightEngine<'_>,
    user: &str,
    months: Option<u32>,
    json: bool,
) -> Result<()> {
    let months = months.unwrap_or(engine.config().forecast.default_months_ahead);
    let prediction = engine
        .predict_balance(user, months)
        .with_context(|| format!("Balance forecast failed for {}", user))?;

    if json {
        return print_json(&prediction);
    }
    print_balance(&prediction, months);
    Ok(())
}

fn print_balance(p: &BalancePrediction, months: u32) {
    println!();
    println!("🔮 Balance forecast ({} months ahead)", months);
    println!("   Predicted:  {:>12.2}", p.predicted_balance);
    println!(
        "   Range:      {:>12.2} … {:.2}",
        p.confidence_interval_lower, p.confidence_interval_upper
    );
    println!("   Accuracy:   {:>11.0}%", p.model_accuracy * 100.0);
    println!();
}

pub fn cmd_predict_savings(engine: &InsightEngine<'_>, user: &str, json: bool) -> Result<()> {
    let prediction = engine
        .predict_savings(user)
        .with_context(|| format!("Savings estimate failed for {}", user))?;

    if json {
        return print_json(&prediction);
    }
    print_savings(&prediction);
    Ok(())
}

fn print_savings(p: &SavingsPrediction) {
    println!();
    println!("💰 Savings potential");
    println!("   Monthly:      ${:.2}", p.monthly_savings_potential);
    println!("   Annual:       ${:.2}", p.annual_savings_potential);
    println!("   Savings rate: {:.1}%", p.savings_rate * 100.0);
    print_list("Recommendations", &p.recommendations);
    println!();
}

pub fn cmd_risk(engine: &InsightEngine<'_>, user: &str, json: bool) -> Result<()> {
    let analysis = engine
        .analyze_risk(user)
        .with_context(|| format!("Risk analysis failed for {}", user))?;

    if json {
        return print_json(&analysis);
    }
    print_risk(&analysis);
    Ok(())
}

fn print_risk(a: &RiskAnalysis) {
    println!();
    println!(
        "{} Risk: {} (score {:.1}/100, default probability {:.0}%)",
        risk_icon(a.risk_level),
        a.risk_level,
        a.risk_score,
        a.default_probability * 100.0
    );
    print_list("Factors", &a.risk_factors);
    print_list("Recommendations", &a.recommendations);
    println!();
}

pub fn cmd_expenses(engine: &InsightEngine<'_>, user: &str, json: bool) -> Result<()> {
    let analysis = engine
        .analyze_expenses(user)
        .with_context(|| format!("Expense analysis failed for {}", user))?;

    if json {
        return print_json(&analysis);
    }
    print_expenses(&analysis);
    Ok(())
}

fn print_expenses(a: &ExpenseAnalysis) {
    println!();
    println!("🧾 Expenses");
    println!("   Monthly average: ${:.2}", a.average_monthly_expenses);
    println!("   Trend:           {}", a.expense_trend);

    if !a.expense_categories.is_empty() {
        let mut categories: Vec<_> = a.expense_categories.iter().collect();
        categories.sort_by(|x, y| y.1.total_cmp(x.1));

        println!();
        println!("   By category:");
        for (name, total) in categories {
            println!("     {:<20} {:>12.2}", super::truncate(name, 20), total);
        }
    }

    if !a.unusual_expenses.is_empty() {
        println!();
        println!("   ⚠️  Unusual expenses:");
        for e in &a.unusual_expenses {
            println!(
                "     {}  {:>10.2}  {:<14} {}",
                e.date,
                e.amount,
                super::truncate(&e.category, 14),
                super::truncate(&e.description, 30)
            );
        }
    }

    print_list("Budget recommendations", &a.budget_recommendations);
    println!();
}

pub fn cmd_insights(engine: &InsightEngine<'_>, user: &str, json: bool) -> Result<()> {
    let insights = engine
        .generate_financial_insights(user)
        .with_context(|| format!("Insight report failed for {}", user))?;

    if json {
        return print_json(&insights);
    }
    print_insights(&insights, engine.config().forecast.default_months_ahead);
    Ok(())
}

fn print_insights(i: &FinancialInsights, months: u32) {
    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│        📈 Financial Health Report       │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  User:          {}", i.user_id);
    println!("  Overall score: {:.0}/100", i.overall_financial_score);

    print_list("Key insights", &i.key_insights);
    print_list("Action items", &i.action_items);

    print_balance(&i.balance_prediction, months);
    print_savings(&i.savings_prediction);
    print_risk(&i.risk_analysis);
    print_expenses(&i.expense_analysis);
}

pub fn cmd_health(engine: &InsightEngine<'_>, user: &str, json: bool) -> Result<()> {
    let report = engine
        .data_sufficiency(user)
        .with_context(|| format!("Data check failed for {}", user))?;

    if json {
        return print_json(&report);
    }
    print_health(&report);
    Ok(())
}

fn print_health(r: &DataSufficiency) {
    let mark = |ready: bool| if ready { "✅" } else { "❌" };

    println!();
    println!("🩺 Data for {}", r.user_id);
    println!("   Events: {}", r.data_points);
    match r.date_range {
        Some(range) => println!("   Range:  {} → {}", range.start, range.end),
        None => println!("   Range:  (no records)"),
    }
    println!();
    println!("   {} Balance prediction", mark(r.readiness.balance_prediction));
    println!("   {} Savings prediction", mark(r.readiness.savings_prediction));
    println!("   {} Risk analysis", mark(r.readiness.risk_analysis));
    println!("   {} Expense analysis", mark(r.readiness.expense_analysis));
    println!();
}
