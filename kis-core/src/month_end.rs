//! Month-rollover maintenance, run once the first time the app is used
//! after a calendar-month change.

use chrono::NaiveDate;

use crate::budget::BudgetSettings;
use crate::commitments::{total_active, Commitment, CommitmentKind};
use crate::dates::month_key;

/// Outcome of a month transition. The caller persists `settings` and
/// `commitments` and discards the old state.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTransition {
    /// False when the marker already matches the current month.
    pub ran: bool,
    /// Surplus banked into the wishlist fund this transition.
    pub surplus: f64,
    pub settings: BudgetSettings,
    pub commitments: Vec<Commitment>,
}

/// Prior-month surplus: whatever was left of the target after commitments
/// and spending, floored at zero.
pub fn month_end_surplus(monthly_target: f64, total_commitments: f64, total_spent: f64) -> f64 {
    (monthly_target - total_commitments - total_spent).max(0.0)
}

/// Run monthly maintenance:
/// 1. bank last month's surplus into the wishlist fund (additive, never
///    rolled into next month's target);
/// 2. decrement every open installment's remaining count;
/// 3. delete installments that have no payments left;
/// 4. clear big events (they are month-scoped);
/// 5. update the last-active-month marker.
///
/// `spent_last_month` is the recorded spend for the marker month, supplied
/// by the caller's store. A marker matching the current month makes this a
/// no-op.
pub fn run_month_transition(
    mut settings: BudgetSettings,
    mut commitments: Vec<Commitment>,
    spent_last_month: f64,
    today: NaiveDate,
) -> MonthTransition {
    let current = month_key(today);
    if settings.last_active_month.as_deref() == Some(current.as_str()) {
        return MonthTransition {
            ran: false,
            surplus: 0.0,
            settings,
            commitments,
        };
    }

    // Surplus only exists relative to a month we actually tracked.
    let surplus = if settings.last_active_month.is_some() {
        month_end_surplus(
            settings.monthly_target,
            total_active(&commitments),
            spent_last_month,
        )
    } else {
        0.0
    };
    settings.wishlist_fund += surplus;

    for commitment in &mut commitments {
        if commitment.kind == CommitmentKind::Installment {
            if let Some(remaining) = commitment.remaining_installments.as_mut() {
                *remaining = remaining.saturating_sub(1);
            }
        }
    }
    commitments.retain(|c| {
        c.kind != CommitmentKind::Installment || c.remaining_installments.unwrap_or(0) > 0
    });

    settings.big_events.clear();
    settings.last_active_month = Some(current);

    MonthTransition {
        ran: true,
        surplus,
        settings,
        commitments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Category;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn installment(name: &str, remaining: u32) -> Commitment {
        Commitment {
            name: name.to_string(),
            amount: 100.0,
            kind: CommitmentKind::Installment,
            total_installments: Some(12),
            remaining_installments: Some(remaining),
            category: Category::Shopping,
        }
    }

    fn settings(target: f64, fund: f64, marker: &str) -> BudgetSettings {
        BudgetSettings {
            monthly_target: target,
            wishlist_fund: fund,
            big_events: Vec::new(),
            last_active_month: Some(marker.to_string()),
        }
    }

    #[test]
    fn test_noop_within_same_month() {
        let t = run_month_transition(
            settings(3000.0, 0.0, "2026-04"),
            vec![installment("Sofa", 3)],
            100.0,
            d("2026-04-20"),
        );
        assert!(!t.ran);
        assert_eq!(t.commitments[0].remaining_installments, Some(3));
    }

    #[test]
    fn test_surplus_banked_additively() {
        let t = run_month_transition(
            settings(3000.0, 250.0, "2026-03"),
            vec![installment("Sofa", 3)],
            2000.0,
            d("2026-04-01"),
        );
        assert!(t.ran);
        // 3000 − 100 (installment) − 2000 spent = 900.
        assert_eq!(t.surplus, 900.0);
        assert_eq!(t.settings.wishlist_fund, 1150.0);
        assert_eq!(t.settings.last_active_month.as_deref(), Some("2026-04"));
    }

    #[test]
    fn test_surplus_never_negative() {
        let t = run_month_transition(
            settings(1000.0, 0.0, "2026-03"),
            Vec::new(),
            5000.0,
            d("2026-04-01"),
        );
        assert_eq!(t.surplus, 0.0);
        assert_eq!(t.settings.wishlist_fund, 0.0);
    }

    #[test]
    fn test_installments_decrement_and_complete() {
        let t = run_month_transition(
            settings(0.0, 0.0, "2026-03"),
            vec![installment("Sofa", 3), installment("Phone", 1)],
            0.0,
            d("2026-04-01"),
        );
        assert_eq!(t.commitments.len(), 1);
        assert_eq!(t.commitments[0].name, "Sofa");
        assert_eq!(t.commitments[0].remaining_installments, Some(2));
    }

    #[test]
    fn test_big_events_cleared_and_first_run_banks_nothing() {
        let mut s = settings(3000.0, 0.0, "2026-03");
        s.big_events.push(crate::big_event::BigEvent::new(
            "Trip",
            400.0,
            d("2026-03-20"),
            d("2026-03-10"),
        ));
        s.last_active_month = None;

        let t = run_month_transition(s, Vec::new(), 0.0, d("2026-04-01"));
        assert!(t.ran);
        assert_eq!(t.surplus, 0.0);
        assert!(t.settings.big_events.is_empty());
    }
}
