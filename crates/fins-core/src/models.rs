//! Domain models for FINS

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to income records that arrive without one
pub const DEFAULT_INCOME_CATEGORY: &str = "misc";

/// A user's declared financial profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    /// Balance the ledger is seeded with
    pub current_balance: Option<f64>,
    /// Declared monthly salary
    pub salary: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Starting balance, zero when undeclared
    pub fn starting_balance(&self) -> f64 {
        self.current_balance.unwrap_or(0.0)
    }

    /// Declared salary, zero when undeclared
    pub fn salary_or_zero(&self) -> f64 {
        self.salary.unwrap_or(0.0)
    }
}

/// Which side of the ledger a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    /// Money leaving (stored as a positive magnitude, negated in the series)
    Expense,
    /// Money arriving
    Income,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    /// Sign applied to the stored magnitude when building a cash-flow series
    pub fn sign(&self) -> f64 {
        match self {
            Self::Expense => -1.0,
            Self::Income => 1.0,
        }
    }
}

impl std::str::FromStr for LedgerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "expenses" | "outflow" => Ok(Self::Expense),
            "income" | "incomes" | "receipt" | "inflow" => Ok(Self::Income),
            _ => Err(format!("Unknown ledger kind: {}", s)),
        }
    }
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored ledger record (expense or income)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub id: i64,
    pub user_id: String,
    pub kind: LedgerKind,
    pub date: NaiveDate,
    /// Always a non-negative magnitude
    pub amount: f64,
    pub category: String,
    pub description: String,
    /// Hash for deduplication
    pub import_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A ledger record before DB insertion
#[derive(Debug, Clone)]
pub struct NewLedgerRecord {
    pub kind: LedgerKind,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Option<String>,
    pub description: String,
    pub import_hash: String,
}

impl NewLedgerRecord {
    /// Category to store, falling back per kind
    pub fn category_or_default(&self) -> String {
        match (&self.category, self.kind) {
            (Some(c), _) if !c.trim().is_empty() => c.trim().to_string(),
            (_, LedgerKind::Income) => DEFAULT_INCOME_CATEGORY.to_string(),
            (_, LedgerKind::Expense) => "uncategorized".to_string(),
        }
    }
}

/// Record counts for one user, used by status output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerCounts {
    pub expenses: i64,
    pub incomes: i64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Fields to change on a stored ledger record; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct LedgerUpdate {
    pub date: Option<NaiveDate>,
    /// New amount (stored as a magnitude)
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl LedgerUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }
}

/// Profile figures plus recent activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub user_id: String,
    /// Last day of the recent-activity window
    pub as_of: NaiveDate,
    pub current_balance: f64,
    pub monthly_salary: f64,
    pub last_30_days_expenses: f64,
    pub last_30_days_receipts: f64,
    /// Receipts minus expenses over the window
    pub net_flow_30_days: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_kind_parse() {
        assert_eq!("expense".parse::<LedgerKind>().unwrap(), LedgerKind::Expense);
        assert_eq!("Receipt".parse::<LedgerKind>().unwrap(), LedgerKind::Income);
        assert!("transfer".parse::<LedgerKind>().is_err());
    }

    #[test]
    fn test_empty_update() {
        assert!(LedgerUpdate::default().is_empty());
        let update = LedgerUpdate {
            description: Some("rent".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_category_fallback() {
        let rec = NewLedgerRecord {
            kind: LedgerKind::Income,
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            amount: 100.0,
            category: Some("  ".into()),
            description: "Transfer".into(),
            import_hash: "h".into(),
        };
        assert_eq!(rec.category_or_default(), DEFAULT_INCOME_CATEGORY);
    }

    #[test]
    fn test_profile_defaults() {
        let now = Utc::now();
        let profile = Profile {
            user_id: "u".into(),
            current_balance: None,
            salary: Some(3000.0),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(profile.starting_balance(), 0.0);
        assert_eq!(profile.salary_or_zero(), 3000.0);
    }
}
