//! Forward projection of committed monthly totals.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::commitments::{Commitment, CommitmentKind};

pub const DEFAULT_HORIZON_MONTHS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCommitment {
    pub name: String,
    pub amount: f64,
    pub kind: CommitmentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProjection {
    /// `YYYY-MM`.
    pub month: String,
    pub total: f64,
    pub breakdown: Vec<ProjectedCommitment>,
}

/// Project committed totals for each of the next `months_ahead` months
/// starting at `from`'s month. Subscriptions contribute every month; an
/// installment contributes while payments remain at that offset.
pub fn project_commitments(
    commitments: &[Commitment],
    months_ahead: usize,
    from: NaiveDate,
) -> Vec<MonthProjection> {
    (0..months_ahead)
        .map(|offset| {
            let months0 = (from.year() as i64 * 12 + from.month0() as i64) + offset as i64;
            let (year, month) = (months0.div_euclid(12), months0.rem_euclid(12) as u32 + 1);

            let breakdown: Vec<ProjectedCommitment> = commitments
                .iter()
                .filter(|c| match c.kind {
                    CommitmentKind::Subscription => true,
                    CommitmentKind::Installment => {
                        c.remaining_installments.unwrap_or(0) as usize > offset
                    }
                })
                .map(|c| ProjectedCommitment {
                    name: c.name.clone(),
                    amount: c.amount,
                    kind: c.kind,
                })
                .collect();

            MonthProjection {
                month: format!("{:04}-{:02}", year, month),
                total: breakdown.iter().map(|b| b.amount).sum(),
                breakdown,
            }
        })
        .collect()
}
