//! Historical baseline: average monthly leisure spend and the proposed
//! monthly target derived from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::transaction::NormalizedTransaction;

/// Proposed target = baseline average × this factor.
pub const BASELINE_REDUCTION_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Average of per-month totals, rounded to whole currency units.
    pub average: f64,
    pub proposed_target: f64,
}

/// Group leisure transactions by calendar month and average the totals.
/// An empty history yields zeros, not an error.
pub fn calculate_baseline(transactions: &[NormalizedTransaction]) -> Baseline {
    if transactions.is_empty() {
        return Baseline {
            average: 0.0,
            proposed_target: 0.0,
        };
    }

    let mut monthly_totals: HashMap<String, f64> = HashMap::new();
    for tx in transactions {
        *monthly_totals.entry(tx.month_key()).or_default() += tx.amount;
    }

    let average = monthly_totals.values().sum::<f64>() / monthly_totals.len() as f64;
    Baseline {
        average: average.round(),
        proposed_target: (average * BASELINE_REDUCTION_FACTOR).round(),
    }
}
