//! Row normalization: raw table rows + a column mapping → canonical
//! transactions. Rows that fail the invariants are data noise, not errors,
//! and are dropped quietly.

use kis_core::transaction::{NormalizedTransaction, RawRow};

use crate::locale::{parse_amount, parse_date};
use crate::mapper::ColumnMapping;

/// Normalize a batch of raw rows. A row survives only when its amount is
/// positive, its description is non-empty, and its date parses to a real
/// calendar date.
pub fn normalize_rows(rows: &[RawRow], mapping: &ColumnMapping) -> Vec<NormalizedTransaction> {
    rows.iter()
        .filter_map(|row| normalize_row(row, mapping))
        .collect()
}

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("").trim()
}

fn normalize_row(row: &RawRow, mapping: &ColumnMapping) -> Option<NormalizedTransaction> {
    let base = cell(row, &mapping.description);
    let details = mapping
        .details
        .as_deref()
        .map(|column| cell(row, column))
        .unwrap_or("");

    // The details column rides along with the description (it often holds
    // the installment counter) unless it just repeats it.
    let description = if !details.is_empty() && details != base {
        format!("{base} {details}")
    } else {
        base.to_string()
    };

    let amount = parse_amount(cell(row, &mapping.amount));
    let date = parse_date(cell(row, &mapping.date));

    if amount <= 0.0 || description.is_empty() {
        return None;
    }

    Some(NormalizedTransaction {
        amount,
        date: date?,
        description,
        original_row: row.clone(),
    })
}
