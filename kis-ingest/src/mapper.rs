//! Column-mapping inference: find the amount/date/description columns from
//! header names using ordered bilingual keyword lists, with an explicit
//! needs-manual-input outcome when inference fails.

use serde::{Deserialize, Serialize};

/// Which columns hold what. Immutable once chosen: either inferred or
/// picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub amount: String,
    pub date: String,
    pub description: String,
    /// Secondary column appended to the description when present (some
    /// exports carry installment counters in a separate field).
    pub details: Option<String>,
}

impl ColumnMapping {
    /// Manual mapping: the user picked columns explicitly, no heuristics.
    pub fn manual(
        amount: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            date: date.into(),
            description: description.into(),
            details,
        }
    }
}

/// Result of automatic inference. Callers must handle both branches; there
/// is no heuristic fallback once inference fails.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingOutcome {
    Mapped(ColumnMapping),
    NeedsManualInput,
}

// "סכום חיוב" (actual charge) is preferred over "סכום עסקה" (total deal
// amount on installment plans), hence "חיוב" outranks the bare "סכום".
const AMOUNT_PATTERNS: &[&str] = &[
    "amount", "sum", "total", "charge", "סכום חיוב", "חיוב", "סכום", "סה\"כ",
];
const DATE_PATTERNS: &[&str] = &["date", "תאריך", "תאריך עסקה", "transaction date"];
const DESC_PATTERNS: &[&str] = &[
    "description", "merchant", "name", "תיאור", "שם בית העסק", "שם בית עסק", "שם העסק",
    "פירוט", "details",
];
const DETAILS_PATTERNS: &[&str] = &["פירוט", "details", "הערות"];

/// First pattern (in priority order) with a containing header wins; first
/// matching header wins for that pattern.
fn detect_column(headers: &[String], patterns: &[&str]) -> Option<String> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    for pattern in patterns {
        if let Some(index) = lowered.iter().position(|h| h.contains(pattern)) {
            return Some(headers[index].clone());
        }
    }
    None
}

/// Infer a mapping from header names. All three of amount, date, and
/// description must be found; the details column is optional and only kept
/// when it differs from the description column.
pub fn auto_detect_mapping(headers: &[String]) -> MappingOutcome {
    let amount = detect_column(headers, AMOUNT_PATTERNS);
    let date = detect_column(headers, DATE_PATTERNS);
    let description = detect_column(headers, DESC_PATTERNS);

    let (Some(amount), Some(date), Some(description)) = (amount, date, description) else {
        return MappingOutcome::NeedsManualInput;
    };

    let details =
        detect_column(headers, DETAILS_PATTERNS).filter(|column| column != &description);

    MappingOutcome::Mapped(ColumnMapping {
        amount,
        date,
        description,
        details,
    })
}
