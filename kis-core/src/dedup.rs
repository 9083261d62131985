//! Duplicate detection between newly imported rows and previously stored
//! transactions, plus exact-match collapsing across files imported in the
//! same session.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::transaction::{NormalizedTransaction, StoredTransaction};

/// Prior months of stored transactions (besides the current one) the
/// review step asks the storage layer for.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 2;

/// Tunable matching thresholds: two days of date slack, 0.5 token overlap
/// for the high-confidence tier, one agora of amount slack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupConfig {
    pub day_tolerance: i64,
    pub similarity_threshold: f64,
    pub amount_epsilon: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            day_tolerance: 2,
            similarity_threshold: 0.5,
            amount_epsilon: 0.01,
        }
    }
}

/// A stored/imported pair suspected to be the same purchase. Surfaced to
/// the user for an exclude/keep decision; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub stored: StoredTransaction,
    /// Index of the imported transaction within the batch under review.
    pub imported_index: usize,
    pub imported: NormalizedTransaction,
    pub confidence: f64,
}

/// Word-set overlap between two descriptions: shared words divided by the
/// larger word-set size, case-insensitive.
pub fn description_similarity(a: &str, b: &str) -> f64 {
    let words_a: HashSet<String> = a.to_lowercase().split_whitespace().map(String::from).collect();
    let words_b: HashSet<String> = b.to_lowercase().split_whitespace().map(String::from).collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let overlap = words_a.intersection(&words_b).count();
    overlap as f64 / words_a.len().max(words_b.len()) as f64
}

/// Match imported transactions against the store. Equal amount (within
/// epsilon) and a date within tolerance qualify a pair; description overlap
/// above the threshold lifts confidence from 0.7 to 0.95.
pub fn find_duplicates(
    stored: &[StoredTransaction],
    imported: &[NormalizedTransaction],
    config: &DedupConfig,
) -> Vec<DuplicateMatch> {
    let mut matches = Vec::new();

    for st in stored {
        for (index, tx) in imported.iter().enumerate() {
            if (st.amount - tx.amount).abs() >= config.amount_epsilon {
                continue;
            }
            if (st.date - tx.date).num_days().abs() > config.day_tolerance {
                continue;
            }
            let similar =
                description_similarity(&st.description, &tx.description) > config.similarity_threshold;
            matches.push(DuplicateMatch {
                stored: st.clone(),
                imported_index: index,
                imported: tx.clone(),
                confidence: if similar { 0.95 } else { 0.7 },
            });
        }
    }

    matches
}

/// Collapse literal re-reads across files imported in one session: an exact
/// (description, amount, date) triple keeps only its first occurrence.
pub fn collapse_exact_duplicates(
    transactions: Vec<NormalizedTransaction>,
) -> Vec<NormalizedTransaction> {
    let mut seen: HashSet<(String, u64, chrono::NaiveDate)> = HashSet::new();
    transactions
        .into_iter()
        .filter(|tx| seen.insert((tx.description.clone(), tx.amount.to_bits(), tx.date)))
        .collect()
}

/// Resume step after user review: drop the imported transactions the user
/// marked as duplicates, identified by their batch index.
pub fn apply_exclusions(
    transactions: Vec<NormalizedTransaction>,
    excluded_indices: &HashSet<usize>,
) -> Vec<NormalizedTransaction> {
    transactions
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !excluded_indices.contains(i))
        .map(|(_, tx)| tx)
        .collect()
}
