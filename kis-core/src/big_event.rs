//! One-time future expenses amortized over the days left until the event.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A planned one-time expense within the current month. `amortized_daily`
/// is derived and recomputable; the amount and date are the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigEvent {
    pub name: String,
    pub amount: f64,
    pub event_date: NaiveDate,
    pub amortized_daily: f64,
}

/// Days from `today` to `event` counting both ends, floored at 1.
fn days_until(today: NaiveDate, event: NaiveDate) -> i64 {
    ((event - today).num_days() + 1).max(1)
}

impl BigEvent {
    pub fn new(name: impl Into<String>, amount: f64, event_date: NaiveDate, today: NaiveDate) -> Self {
        let mut event = Self {
            name: name.into(),
            amount,
            event_date,
            amortized_daily: 0.0,
        };
        event.recalculate(today);
        event
    }

    /// Refresh the derived daily cost. Past events stop contributing.
    pub fn recalculate(&mut self, today: NaiveDate) {
        self.amortized_daily = if self.event_date < today {
            0.0
        } else {
            self.amount / days_until(today, self.event_date) as f64
        };
    }
}

/// Refresh every event's daily cost (call on day change).
pub fn recalculate_all(events: &mut [BigEvent], today: NaiveDate) {
    for event in events {
        event.recalculate(today);
    }
}

/// Combined daily amortization across events that have not passed yet.
pub fn total_amortization(events: &[BigEvent], today: NaiveDate) -> f64 {
    events
        .iter()
        .filter(|e| e.event_date >= today)
        .map(|e| e.amortized_daily)
        .sum()
}
