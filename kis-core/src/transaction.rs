//! Canonical transaction types produced by ingestion and consumed by every
//! downstream stage (classification, commitments, dedup, budget math).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of a tabular bank export, keyed by header name. Ephemeral:
/// produced by the file reader, kept on the normalized transaction only for
/// traceability.
pub type RawRow = BTreeMap<String, String>;

/// A transaction that survived normalization.
///
/// Invariants: `amount > 0`, `description` non-empty, `date` is a real
/// calendar date. Rows failing any of these are dropped during
/// normalization, never constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    /// Source row this transaction was built from.
    #[serde(default)]
    pub original_row: RawRow,
}

impl NormalizedTransaction {
    pub fn new(amount: f64, date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            amount,
            date,
            description: description.into(),
            original_row: RawRow::new(),
        }
    }

    /// Calendar month this transaction falls in, as a `YYYY-MM` key.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Read-model of a previously persisted transaction, as handed back by the
/// storage layer for deduplication lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
}
