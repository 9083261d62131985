//! Daily-allowance math. The snapshot is recomputed from scratch on every
//! refresh as a pure function of settings, commitments, spend history, and
//! today's date, so it carries no state across calls.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::big_event::{total_amortization, BigEvent};
use crate::commitments::{total_active, Commitment};
use crate::dates::{days_remaining_in_month, yesterday};
use crate::transaction::StoredTransaction;

/// Scalar settings owned by the key/value store, read fresh per refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSettings {
    pub monthly_target: f64,
    pub wishlist_fund: f64,
    pub big_events: Vec<BigEvent>,
    /// `YYYY-MM` marker of the last month the app ran maintenance for.
    pub last_active_month: Option<String>,
}

/// Everything the budget screen shows. Never mutated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub monthly_target: f64,
    pub total_commitments: f64,
    pub spent_this_month: f64,
    pub days_remaining: u32,
    pub daily_budget: f64,
    pub rolling_offset: f64,
    pub big_event_amortization: f64,
    pub wishlist_fund: f64,
    pub surplus: f64,
}

/// `max(0, (target − commitments − spent − amortization) / days)`.
pub fn calculate_daily_budget(
    monthly_target: f64,
    total_commitments: f64,
    spent_this_month: f64,
    days_remaining: u32,
    big_event_amortization: f64,
) -> f64 {
    if days_remaining == 0 {
        return 0.0;
    }
    let available =
        monthly_target - total_commitments - spent_this_month - big_event_amortization;
    (available / days_remaining as f64).max(0.0)
}

/// Total recorded spend on a single date.
pub fn spent_on(transactions: &[StoredTransaction], date: NaiveDate) -> f64 {
    transactions
        .iter()
        .filter(|tx| tx.date == date)
        .map(|tx| tx.amount)
        .sum()
}

/// Total recorded spend within a calendar month.
pub fn spent_in_month(transactions: &[StoredTransaction], year: i32, month: u32) -> f64 {
    transactions
        .iter()
        .filter(|tx| tx.date.year() == year && tx.date.month() == month)
        .map(|tx| tx.amount)
        .sum()
}

/// Build today's snapshot.
///
/// The rolling offset is a one-day lookback: when yesterday's recorded
/// spend is exactly zero, one extra day's allowance (computed as if
/// yesterday were still available, with `days_remaining + 1`) is added to
/// today's budget. Each day only looks one day back; consecutive zero-spend
/// days do not accumulate a streak.
pub fn compute_snapshot(
    settings: &BudgetSettings,
    commitments: &[Commitment],
    transactions: &[StoredTransaction],
    today: NaiveDate,
) -> BudgetSnapshot {
    let monthly_target = settings.monthly_target;
    let total_commitments = total_active(commitments);
    let spent_this_month = spent_in_month(transactions, today.year(), today.month());
    let days_remaining = days_remaining_in_month(today);
    let big_event_amortization = total_amortization(&settings.big_events, today);

    let yesterday_spend = spent_on(transactions, yesterday(today));
    let rolling_offset = if yesterday_spend == 0.0 {
        calculate_daily_budget(
            monthly_target,
            total_commitments,
            spent_this_month,
            days_remaining + 1,
            big_event_amortization,
        )
    } else {
        0.0
    };

    let daily_budget = calculate_daily_budget(
        monthly_target,
        total_commitments,
        spent_this_month,
        days_remaining,
        big_event_amortization,
    ) + rolling_offset;

    BudgetSnapshot {
        monthly_target,
        total_commitments,
        spent_this_month,
        days_remaining,
        daily_budget,
        rolling_offset,
        big_event_amortization,
        wishlist_fund: settings.wishlist_fund,
        surplus: (monthly_target - total_commitments - spent_this_month).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitments::CommitmentKind;
    use crate::taxonomy::Category;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn spend(amount: f64, date: &str) -> StoredTransaction {
        StoredTransaction {
            id: 0,
            date: d(date),
            description: "spend".to_string(),
            amount,
        }
    }

    fn subscription(amount: f64) -> Commitment {
        Commitment {
            name: "sub".to_string(),
            amount,
            kind: CommitmentKind::Subscription,
            total_installments: None,
            remaining_installments: None,
            category: Category::Subscriptions,
        }
    }

    #[test]
    fn test_daily_budget_never_negative() {
        assert_eq!(calculate_daily_budget(1000.0, 800.0, 900.0, 10, 0.0), 0.0);
        assert_eq!(calculate_daily_budget(1000.0, 0.0, 0.0, 0, 0.0), 0.0);
    }

    #[test]
    fn test_daily_budget_basic() {
        let b = calculate_daily_budget(3000.0, 500.0, 600.0, 15, 0.0);
        assert!((b - 126.666_666).abs() < 0.001);
    }

    #[test]
    fn test_snapshot_with_zero_spend_yesterday() {
        // April 16: 15 days remaining (April has 30 days).
        let today = d("2026-04-16");
        let settings = BudgetSettings {
            monthly_target: 3000.0,
            ..Default::default()
        };
        let commitments = vec![subscription(500.0)];
        let transactions = vec![spend(600.0, "2026-04-10")];

        let snap = compute_snapshot(&settings, &commitments, &transactions, today);
        assert_eq!(snap.days_remaining, 15);
        // Offset computed with 16 days: 1900/16 = 118.75.
        assert!((snap.rolling_offset - 118.75).abs() < 0.001);
        assert!((snap.daily_budget - 245.416_666).abs() < 0.001);
    }

    #[test]
    fn test_snapshot_without_offset_when_yesterday_had_spend() {
        let today = d("2026-04-16");
        let settings = BudgetSettings {
            monthly_target: 3000.0,
            ..Default::default()
        };
        let commitments = vec![subscription(500.0)];
        let transactions = vec![spend(550.0, "2026-04-10"), spend(50.0, "2026-04-15")];

        let snap = compute_snapshot(&settings, &commitments, &transactions, today);
        assert_eq!(snap.rolling_offset, 0.0);
        assert!((snap.daily_budget - 126.666_666).abs() < 0.001);
    }

    #[test]
    fn test_snapshot_is_pure() {
        let today = d("2026-04-16");
        let settings = BudgetSettings {
            monthly_target: 2500.0,
            wishlist_fund: 120.0,
            ..Default::default()
        };
        let commitments = vec![subscription(300.0)];
        let transactions = vec![spend(75.0, "2026-04-02")];

        let a = compute_snapshot(&settings, &commitments, &transactions, today);
        let b = compute_snapshot(&settings, &commitments, &transactions, today);
        assert_eq!(a, b);
    }

    #[test]
    fn test_amortization_reduces_daily_budget() {
        let today = d("2026-04-16");
        let settings = BudgetSettings {
            monthly_target: 3000.0,
            big_events: vec![crate::big_event::BigEvent::new(
                "Wedding gift",
                750.0,
                d("2026-04-30"),
                today,
            )],
            ..Default::default()
        };
        let transactions = vec![spend(10.0, "2026-04-15")];

        let snap = compute_snapshot(&settings, &[], &transactions, today);
        // 750 over 15 days = 50/day of amortization.
        assert_eq!(snap.big_event_amortization, 50.0);
        assert!((snap.daily_budget - (3000.0 - 10.0 - 50.0) / 15.0).abs() < 0.001);
    }

    #[test]
    fn test_spent_in_month_ignores_other_months() {
        let txs = vec![spend(100.0, "2026-03-31"), spend(40.0, "2026-04-01")];
        assert_eq!(spent_in_month(&txs, 2026, 4), 40.0);
    }
}
