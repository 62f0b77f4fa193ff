//! Savings capacity estimate

use crate::config::SavingsConfig;
use crate::error::{Error, Result};
use crate::ledger::CashFlowSeries;
use crate::stats::{mean, ratio_or_zero};

use super::types::SavingsPrediction;

pub const REC_CUT_NON_ESSENTIAL: &str = "Consider cutting non-essential expenses";
pub const REC_MONTHLY_BUDGET: &str = "Set up a monthly budget";
pub const REC_EXPENSES_EXCEED_INCOME: &str = "Your expenses are exceeding your income";
pub const REC_REVIEW_CATEGORIES: &str = "Review your expenses by category";

/// Estimate how much the user could save per month
///
/// The potential is a fixed share of the average monthly net flow, never
/// negative. The savings rate relates it to the declared salary.
pub fn predict_savings(
    series: &CashFlowSeries,
    salary: f64,
    config: &SavingsConfig,
) -> Result<SavingsPrediction> {
    if series.is_empty() {
        return Err(Error::InsufficientData(
            "no ledger events to estimate savings from".into(),
        ));
    }

    let monthly: Vec<f64> = series.monthly_net_flows().into_values().collect();
    let average_flow = mean(&monthly);

    let monthly_potential = (average_flow * config.savings_fraction).max(0.0);
    let savings_rate = if salary > 0.0 {
        ratio_or_zero(monthly_potential, salary)
    } else {
        0.0
    };

    let mut recommendations = Vec::new();
    if savings_rate < config.low_savings_rate {
        recommendations.push(REC_CUT_NON_ESSENTIAL.to_string());
        recommendations.push(REC_MONTHLY_BUDGET.to_string());
    }
    if average_flow < 0.0 {
        recommendations.push(REC_EXPENSES_EXCEED_INCOME.to_string());
        recommendations.push(REC_REVIEW_CATEGORIES.to_string());
    }

    Ok(SavingsPrediction {
        monthly_savings_potential: monthly_potential,
        annual_savings_potential: monthly_potential * 12.0,
        savings_rate,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::{date, series};

    #[test]
    fn test_potential_from_average_monthly_flow() {
        let s = series(
            1000.0,
            &[
                (date(2026, 1, 5), 2000.0, "salary"),
                (date(2026, 1, 9), -500.0, "rent"),
                (date(2026, 2, 5), 1000.0, "salary"),
                (date(2026, 2, 9), -500.0, "rent"),
            ],
        );
        // months: +1500, +500 -> average 1000
        let p = predict_savings(&s, 1000.0, &SavingsConfig::default()).unwrap();
        assert!((p.monthly_savings_potential - 200.0).abs() < 1e-9);
        assert!((p.annual_savings_potential - 2400.0).abs() < 1e-9);
        assert!((p.savings_rate - 0.2).abs() < 1e-9);
        assert!(p.recommendations.is_empty());
    }

    #[test]
    fn test_zero_salary_gives_zero_rate() {
        let s = series(0.0, &[(date(2026, 1, 5), 5000.0, "gift")]);
        let p = predict_savings(&s, 0.0, &SavingsConfig::default()).unwrap();
        assert_eq!(p.savings_rate, 0.0);
        assert_eq!(p.monthly_savings_potential, 1000.0);
        assert_eq!(
            p.recommendations,
            vec![REC_CUT_NON_ESSENTIAL, REC_MONTHLY_BUDGET]
        );
    }

    #[test]
    fn test_negative_flow_never_negative_potential() {
        let s = series(
            0.0,
            &[
                (date(2026, 1, 5), 100.0, "salary"),
                (date(2026, 1, 9), -400.0, "rent"),
            ],
        );
        let p = predict_savings(&s, 3000.0, &SavingsConfig::default()).unwrap();
        assert_eq!(p.monthly_savings_potential, 0.0);
        assert_eq!(p.annual_savings_potential, 0.0);
        assert_eq!(
            p.recommendations,
            vec![
                REC_CUT_NON_ESSENTIAL,
                REC_MONTHLY_BUDGET,
                REC_EXPENSES_EXCEED_INCOME,
                REC_REVIEW_CATEGORIES,
            ]
        );
    }

    #[test]
    fn test_empty_series() {
        let err = predict_savings(&CashFlowSeries::empty(10.0), 1.0, &SavingsConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }
}
