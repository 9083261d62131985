//! Recurring-obligation detection: installment plans extracted from
//! description counters, subscriptions from same-merchant charges recurring
//! across months.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::taxonomy::{categorize, Category};
use crate::transaction::NormalizedTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentKind {
    Subscription,
    Installment,
}

/// A commitment found during import, shown to the user for confirmation
/// before the storage layer persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedCommitment {
    pub name: String,
    pub amount: f64,
    pub kind: CommitmentKind,
    pub total_installments: Option<u32>,
    pub remaining_installments: Option<u32>,
    pub category: Category,
    /// User can opt out before persisting; defaults to selected.
    pub selected: bool,
}

impl DetectedCommitment {
    /// Strip the review-only fields, yielding the long-lived record.
    pub fn into_commitment(self) -> Commitment {
        Commitment {
            name: self.name,
            amount: self.amount,
            kind: self.kind,
            total_installments: self.total_installments,
            remaining_installments: self.remaining_installments,
            category: self.category,
        }
    }
}

/// Persisted commitment record. Installments are decremented at month end
/// and deleted once no payments remain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commitment {
    pub name: String,
    pub amount: f64,
    pub kind: CommitmentKind,
    pub total_installments: Option<u32>,
    pub remaining_installments: Option<u32>,
    pub category: Category,
}

impl Commitment {
    /// Whether this commitment still charges the current month.
    pub fn is_active(&self) -> bool {
        match self.kind {
            CommitmentKind::Subscription => true,
            CommitmentKind::Installment => self.remaining_installments.unwrap_or(0) > 0,
        }
    }
}

/// Sum of monthly charges across active commitments.
pub fn total_active(commitments: &[Commitment]) -> f64 {
    commitments
        .iter()
        .filter(|c| c.is_active())
        .map(|c| c.amount)
        .sum()
}

/// Ordered installment-counter patterns; first match wins per description.
fn installment_patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // "3 of 12", "payment 3/12"
            Regex::new(r"(?i)(\d+)\s*(?:of|/)\s*(\d+)").expect("invalid installment regex"),
            // "תשלום 3 מתוך 12"
            Regex::new(r"תשלום\s*(\d+)\s*מתוך\s*(\d+)").expect("invalid installment regex"),
            // "3/12 תשלומים"
            Regex::new(r"(\d+)\s*/\s*(\d+)\s*תשלומים").expect("invalid installment regex"),
            // bank code "תש 03/12"
            Regex::new(r"תש\s*(\d+)/(\d+)").expect("invalid installment regex"),
        ]
    })
}

/// Extract installment plans from description counters.
///
/// The same plan seen through several installment rows is reported once,
/// keyed by (merchant, amount, total).
pub fn detect_installments(transactions: &[NormalizedTransaction]) -> Vec<DetectedCommitment> {
    let mut commitments = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for tx in transactions {
        for pattern in installment_patterns() {
            let Some(caps) = pattern.captures(&tx.description) else {
                continue;
            };
            let current: u32 = match caps[1].parse() {
                Ok(n) => n,
                Err(_) => break,
            };
            let total: u32 = match caps[2].parse() {
                Ok(n) => n,
                Err(_) => break,
            };
            if total == 0 || current == 0 || current > total {
                break;
            }

            // Merchant name with the counter text removed; a description
            // that is nothing but the counter keeps its full text.
            let stripped = pattern.replace(&tx.description, "").trim().to_string();
            let name = if stripped.is_empty() {
                tx.description.clone()
            } else {
                stripped
            };

            let key = format!("{}|{}|{}", name, tx.amount, total);
            if seen.insert(key) {
                // The payment just seen still counts as remaining.
                let remaining = total - current + 1;
                commitments.push(DetectedCommitment {
                    category: categorize(&name),
                    name,
                    amount: tx.amount,
                    kind: CommitmentKind::Installment,
                    total_installments: Some(total),
                    remaining_installments: Some(remaining),
                    selected: true,
                });
            }
            break;
        }
    }

    commitments
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("invalid digits regex"))
}

fn punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("invalid punct regex"))
}

/// Grouping key for a merchant: lowercased description with digits and
/// punctuation stripped, so "WOLT *1234" and "wolt 5678" collapse.
pub fn merchant_key(description: &str) -> String {
    let lower = description.to_lowercase();
    let no_digits = digits_re().replace_all(&lower, "");
    punct_re().replace_all(&no_digits, "").trim().to_string()
}

/// Find subscriptions: the same merchant/amount pair charged in at least two
/// distinct calendar months. Evaluate over the leisure set only.
pub fn detect_subscriptions(transactions: &[NormalizedTransaction]) -> Vec<DetectedCommitment> {
    struct Group {
        name: String,
        amount: f64,
        months: HashSet<String>,
    }

    let mut groups: HashMap<String, Group> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for tx in transactions {
        let key = format!("{}|{:.2}", merchant_key(&tx.description), tx.amount);
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Group {
                name: tx.description.clone(),
                amount: tx.amount,
                months: HashSet::new(),
            }
        });
        group.months.insert(tx.month_key());
    }

    order
        .into_iter()
        .filter_map(|key| {
            let group = &groups[&key];
            if group.months.len() < 2 {
                return None;
            }
            Some(DetectedCommitment {
                name: group.name.clone(),
                amount: group.amount,
                kind: CommitmentKind::Subscription,
                total_installments: None,
                remaining_installments: None,
                category: categorize(&group.name),
                selected: true,
            })
        })
        .collect()
}
