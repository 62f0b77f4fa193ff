//! Ledger aggregation
//!
//! Builds the unified, date-ordered cash-flow series for one user from stored
//! expense and income records plus the declared starting balance. Every
//! analysis call rebuilds the series; nothing here is cached.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{LedgerKind, LedgerRecord, Profile};

/// Calendar month key (year, month)
pub type MonthKey = (i32, u32);

/// Read access to a user's stored ledger
///
/// Implemented by [`crate::db::Database`]; tests may provide their own.
pub trait LedgerStore: Send + Sync {
    /// Fetch the declared profile, if any
    fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Fetch expense records dated within `since..=until`
    fn fetch_expenses(
        &self,
        user_id: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<LedgerRecord>>;

    /// Fetch income records dated within `since..=until`
    fn fetch_incomes(
        &self,
        user_id: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<LedgerRecord>>;
}

/// One signed cash movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashEvent {
    pub date: NaiveDate,
    /// Negative = outflow, positive = inflow
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub kind: LedgerKind,
}

impl CashEvent {
    /// Convert a stored record using the sign convention of its kind
    pub fn from_record(record: &LedgerRecord) -> Self {
        Self {
            date: record.date,
            amount: record.kind.sign() * record.amount.abs(),
            category: record.category.clone(),
            description: record.description.clone(),
            kind: record.kind,
        }
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }

    pub fn month(&self) -> MonthKey {
        (self.date.year(), self.date.month())
    }
}

/// Net flow of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// An outflow viewed as a positive expense amount
#[derive(Debug, Clone, Copy)]
pub struct Outflow<'a> {
    pub event: &'a CashEvent,
    pub amount: f64,
}

/// Date-ordered cash-flow series with a running balance
#[derive(Debug, Clone, Default, Serialize)]
pub struct CashFlowSeries {
    starting_balance: f64,
    events: Vec<CashEvent>,
    balances: Vec<f64>,
}

impl CashFlowSeries {
    /// Sort events by date (stable, so same-day events keep insertion order)
    /// and compute the running balance.
    pub fn new(starting_balance: f64, mut events: Vec<CashEvent>) -> Self {
        events.sort_by_key(|e| e.date);

        let balances = events
            .iter()
            .scan(starting_balance, |balance, e| {
                *balance += e.amount;
                Some(*balance)
            })
            .collect();

        Self {
            starting_balance,
            events,
            balances,
        }
    }

    /// An explicitly empty series (no records for the user)
    pub fn empty(starting_balance: f64) -> Self {
        Self::new(starting_balance, Vec::new())
    }

    /// Build from a profile and stored records. Expenses are inserted before
    /// incomes, which decides the order of same-day events.
    pub fn from_records(
        profile: Option<&Profile>,
        expenses: &[LedgerRecord],
        incomes: &[LedgerRecord],
    ) -> Self {
        let starting_balance = profile.map(Profile::starting_balance).unwrap_or(0.0);
        let events = expenses
            .iter()
            .chain(incomes)
            .map(CashEvent::from_record)
            .collect();
        Self::new(starting_balance, events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn starting_balance(&self) -> f64 {
        self.starting_balance
    }

    pub fn events(&self) -> &[CashEvent] {
        &self.events
    }

    /// Running balance after each event, aligned with [`Self::events`]
    pub fn balances(&self) -> &[f64] {
        &self.balances
    }

    /// Balance after the last event (the starting balance when empty)
    pub fn final_balance(&self) -> f64 {
        self.balances
            .last()
            .copied()
            .unwrap_or(self.starting_balance)
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.amount).collect()
    }

    pub fn min_balance(&self) -> Option<f64> {
        self.balances.iter().copied().reduce(f64::min)
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// Net flow per calendar month, oldest first
    pub fn monthly_net_flows(&self) -> BTreeMap<MonthKey, f64> {
        let mut months = BTreeMap::new();
        for e in &self.events {
            *months.entry(e.month()).or_insert(0.0) += e.amount;
        }
        months
    }

    /// One point per calendar day that has events, summing that day's amounts
    pub fn daily_totals(&self) -> Vec<DailyPoint> {
        let mut days: Vec<DailyPoint> = Vec::new();
        for e in &self.events {
            match days.last_mut() {
                Some(last) if last.date == e.date => last.value += e.amount,
                _ => days.push(DailyPoint {
                    date: e.date,
                    value: e.amount,
                }),
            }
        }
        days
    }

    /// Outflow events with their absolute amounts
    pub fn outflows(&self) -> Vec<Outflow<'_>> {
        self.events
            .iter()
            .filter(|e| e.is_outflow())
            .map(|e| Outflow {
                event: e,
                amount: e.amount.abs(),
            })
            .collect()
    }
}

/// A user's series plus the profile values the analyzers need
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub user_id: String,
    pub series: CashFlowSeries,
    /// Declared salary (zero when the profile is missing or incomplete)
    pub salary: f64,
    pub window_start: NaiveDate,
}

/// First day included in a lookback of `months` calendar months ending at `as_of`
pub fn window_start(as_of: NaiveDate, months: u32) -> NaiveDate {
    as_of
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Fetch and aggregate one user's ledger
pub fn load_snapshot(
    store: &dyn LedgerStore,
    user_id: &str,
    lookback_months: u32,
    as_of: NaiveDate,
) -> Result<LedgerSnapshot> {
    let since = window_start(as_of, lookback_months);

    let profile = store.fetch_profile(user_id)?;
    if profile.is_none() {
        debug!(user_id, "No profile found, using zero balance and salary");
    }

    // Records dated after `as_of` are not part of the window
    let expenses = store.fetch_expenses(user_id, since, as_of)?;
    let incomes = store.fetch_incomes(user_id, since, as_of)?;

    let series = CashFlowSeries::from_records(profile.as_ref(), &expenses, &incomes);
    let salary = profile.as_ref().map(Profile::salary_or_zero).unwrap_or(0.0);

    debug!(
        user_id,
        since = %since,
        until = %as_of,
        expenses = expenses.len(),
        incomes = incomes.len(),
        "Ledger aggregated"
    );

    Ok(LedgerSnapshot {
        user_id: user_id.to_string(),
        series,
        salary,
        window_start: since,
    })
}
