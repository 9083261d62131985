//! Multi-file import session: files are ingested strictly one at a time,
//! a failed file is recorded and skipped, and the accumulated rows are
//! analyzed as one batch (cross-file dedup, leisure split, commitment
//! detection, baseline) ahead of the user review steps.

use std::collections::HashSet;
use std::mem;

use kis_core::baseline::{calculate_baseline, Baseline};
use kis_core::commitments::{
    detect_installments, detect_subscriptions, merchant_key, Commitment, DetectedCommitment,
};
use kis_core::dedup::{
    apply_exclusions, collapse_exact_duplicates, find_duplicates, DedupConfig, DuplicateMatch,
};
use kis_core::taxonomy::{split_leisure, Category};
use kis_core::transaction::{NormalizedTransaction, StoredTransaction};

use crate::error::IngestError;
use crate::mapper::{auto_detect_mapping, ColumnMapping, MappingOutcome};
use crate::reader::{read_table, FileKind};
use crate::normalizer::normalize_rows;

/// A file the session could not read. Kept for the end-of-import report.
#[derive(Debug)]
pub struct ImportFailure {
    pub file_name: String,
    pub error: IngestError,
}

/// Per-file outcome of [`ImportSession::ingest_file`].
#[derive(Debug, PartialEq)]
pub enum FileStatus {
    /// Rows were added to the session (count after row-level filtering).
    Imported { rows: usize },
    /// Column inference failed. The caller collects a manual mapping from
    /// these headers and calls `ingest_file` again with it.
    NeedsMapping { headers: Vec<String> },
    /// File-format error; recorded in the failure list, session continues.
    Failed,
}

/// Accumulates normalized rows across the files of one import.
#[derive(Debug, Default)]
pub struct ImportSession {
    transactions: Vec<NormalizedTransaction>,
    failures: Vec<ImportFailure>,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one file. Never propagates file-format errors: they become
    /// failure records so the remaining files still import.
    pub fn ingest_file(
        &mut self,
        file_name: &str,
        bytes: &[u8],
        kind: FileKind,
        manual_mapping: Option<&ColumnMapping>,
    ) -> FileStatus {
        let table = match read_table(bytes, kind) {
            Ok(table) => table,
            Err(error) => {
                self.failures.push(ImportFailure {
                    file_name: file_name.to_string(),
                    error,
                });
                return FileStatus::Failed;
            }
        };

        let mapping = match manual_mapping {
            Some(mapping) => mapping.clone(),
            None => match auto_detect_mapping(&table.headers) {
                MappingOutcome::Mapped(mapping) => mapping,
                MappingOutcome::NeedsManualInput => {
                    return FileStatus::NeedsMapping {
                        headers: table.headers,
                    };
                }
            },
        };

        let rows = normalize_rows(&table.rows, &mapping);
        let added = rows.len();
        self.transactions.extend(rows);
        FileStatus::Imported { rows: added }
    }

    pub fn transactions(&self) -> &[NormalizedTransaction] {
        &self.transactions
    }

    pub fn failures(&self) -> &[ImportFailure] {
        &self.failures
    }

    /// Analyze the accumulated batch. Exact (description, amount, date)
    /// re-reads across files collapse silently first: same-batch files are
    /// literal duplicates, unlike the store comparison which needs review.
    pub fn analyze(&self) -> ImportAnalysis {
        let deduped = collapse_exact_duplicates(self.transactions.clone());

        // Installment counters can sit on non-leisure rows (insurance,
        // tuition plans), so detection runs before the leisure split.
        let mut commitments = detect_installments(&deduped);

        let split = split_leisure(deduped);
        commitments.extend(detect_subscriptions(&split.leisure));

        let baseline = calculate_baseline(&split.leisure);

        ImportAnalysis {
            unrecognized: group_by_merchant(split.unrecognized),
            leisure: split.leisure,
            commitments,
            baseline,
        }
    }
}

/// Unrecognized rows for one merchant, classified as a batch by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantGroup {
    pub label: String,
    pub transactions: Vec<NormalizedTransaction>,
}

fn group_by_merchant(transactions: Vec<NormalizedTransaction>) -> Vec<MerchantGroup> {
    let mut groups: Vec<(String, MerchantGroup)> = Vec::new();
    for tx in transactions {
        let key = merchant_key(&tx.description);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.transactions.push(tx),
            None => {
                let label = tx.description.clone();
                groups.push((
                    key,
                    MerchantGroup {
                        label,
                        transactions: vec![tx],
                    },
                ));
            }
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

/// Everything one import produced, pending user review.
#[derive(Debug)]
pub struct ImportAnalysis {
    /// Categorized discretionary transactions.
    pub leisure: Vec<NormalizedTransaction>,
    /// Uncategorized discretionary rows, grouped per merchant.
    pub unrecognized: Vec<MerchantGroup>,
    pub commitments: Vec<DetectedCommitment>,
    pub baseline: Baseline,
}

impl ImportAnalysis {
    /// Match the batch against previously stored transactions. The matches
    /// go to the user; nothing is dropped until [`Self::exclude_duplicates`].
    pub fn find_store_duplicates(
        &self,
        stored: &[StoredTransaction],
        config: &DedupConfig,
    ) -> Vec<DuplicateMatch> {
        find_duplicates(stored, &self.leisure, config)
    }

    /// Resume after review: drop the leisure transactions (by batch index)
    /// the user confirmed as duplicates.
    pub fn exclude_duplicates(&mut self, excluded_indices: &HashSet<usize>) {
        self.leisure = apply_exclusions(mem::take(&mut self.leisure), excluded_indices);
    }

    /// User classified a whole merchant group: its rows re-enter the
    /// leisure set tagged with the category name so later classification
    /// passes resolve them consistently.
    pub fn classify_unrecognized(&mut self, group_index: usize, category: Category) {
        if group_index >= self.unrecognized.len() {
            return;
        }
        let group = self.unrecognized.remove(group_index);
        for mut tx in group.transactions {
            tx.description = format!("{} [{}]", tx.description, category.as_str());
            self.leisure.push(tx);
        }
    }

    /// User skipped a merchant group; its rows stay out of the leisure set.
    pub fn skip_unrecognized(&mut self, group_index: usize) {
        if group_index < self.unrecognized.len() {
            self.unrecognized.remove(group_index);
        }
    }

    /// Commitments the user left selected, as persistable records.
    pub fn selected_commitments(&self) -> Vec<Commitment> {
        self.commitments
            .iter()
            .filter(|c| c.selected)
            .cloned()
            .map(DetectedCommitment::into_commitment)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kis_core::commitments::CommitmentKind;

    const VISA_CSV: &str = "\
תאריך עסקה,שם בית העסק,סכום חיוב,פירוט
07/01/2026,WOLT TEL AVIV,45.90,
15/01/2026,NETFLIX.COM,54.90,
07/02/2026,WOLT TEL AVIV,52.00,
15/02/2026,NETFLIX.COM,54.90,
03/02/2026,ריהוט הארץ,400.00,תשלום 2 מתוך 6
20/02/2026,ארנונה עיריית ת\"א,612.00,
11/02/2026,PAYBOX FRIEND,80.00,
";

    fn ingest(session: &mut ImportSession, name: &str, content: &str) -> FileStatus {
        session.ingest_file(name, content.as_bytes(), FileKind::Delimited, None)
    }

    #[test]
    fn test_single_file_end_to_end() {
        let mut session = ImportSession::new();
        let status = ingest(&mut session, "visa.csv", VISA_CSV);
        assert_eq!(status, FileStatus::Imported { rows: 7 });

        let analysis = session.analyze();
        // Non-leisure ארנונה row is gone; the furniture installment and
        // PAYBOX match no category and await manual classification.
        assert_eq!(analysis.unrecognized.len(), 2);
        assert_eq!(analysis.unrecognized[1].label, "PAYBOX FRIEND");
        assert_eq!(analysis.leisure.len(), 4);

        // One installment plan + two subscription-shaped merchants
        // (WOLT differs in amount between months, so only NETFLIX counts).
        let installments: Vec<_> = analysis
            .commitments
            .iter()
            .filter(|c| c.kind == CommitmentKind::Installment)
            .collect();
        assert_eq!(installments.len(), 1);
        assert_eq!(installments[0].remaining_installments, Some(5));

        let subscriptions: Vec<_> = analysis
            .commitments
            .iter()
            .filter(|c| c.kind == CommitmentKind::Subscription)
            .collect();
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].name, "NETFLIX.COM");
    }

    #[test]
    fn test_failed_file_recorded_and_session_continues() {
        let mut session = ImportSession::new();
        let status = session.ingest_file(
            "mislabeled.csv",
            b"PK\x03\x04zipzipzip",
            FileKind::Delimited,
            None,
        );
        assert_eq!(status, FileStatus::Failed);
        assert_eq!(session.failures().len(), 1);
        assert!(matches!(
            session.failures()[0].error,
            IngestError::MalformedFile
        ));

        assert_eq!(
            ingest(&mut session, "visa.csv", VISA_CSV),
            FileStatus::Imported { rows: 7 }
        );
    }

    #[test]
    fn test_needs_mapping_then_manual_retry() {
        let content = "Col A,Col B,Col C\n07/01/2026,COFFEE BAR,18.50\n";
        let mut session = ImportSession::new();

        let FileStatus::NeedsMapping { headers } = ingest(&mut session, "odd.csv", content)
        else {
            panic!("expected NeedsMapping");
        };
        assert_eq!(headers, ["Col A", "Col B", "Col C"]);

        let manual = ColumnMapping::manual("Col C", "Col A", "Col B", None);
        let status = session.ingest_file("odd.csv", content.as_bytes(), FileKind::Delimited, Some(&manual));
        assert_eq!(status, FileStatus::Imported { rows: 1 });
        assert_eq!(session.transactions()[0].description, "COFFEE BAR");
    }

    #[test]
    fn test_cross_file_exact_duplicates_collapse() {
        let file_a = "Date,Description,Amount\n07/01/2026,CAFE GREG,18.50\n";
        let file_b = "Date,Description,Amount\n07/01/2026,CAFE GREG,18.50\n08/01/2026,CAFE GREG,18.50\n";

        let mut session = ImportSession::new();
        ingest(&mut session, "a.csv", file_a);
        ingest(&mut session, "b.csv", file_b);
        assert_eq!(session.transactions().len(), 3);

        let analysis = session.analyze();
        assert_eq!(analysis.leisure.len(), 2);
    }

    #[test]
    fn test_store_review_roundtrip() {
        let mut session = ImportSession::new();
        ingest(&mut session, "visa.csv", VISA_CSV);
        let mut analysis = session.analyze();

        let stored = vec![StoredTransaction {
            id: 7,
            date: NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
            description: "WOLT TEL AVIV".to_string(),
            amount: 45.9,
        }];
        let matches = analysis.find_store_duplicates(&stored, &DedupConfig::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].confidence, 0.95);

        let excluded: HashSet<usize> = matches.iter().map(|m| m.imported_index).collect();
        let before = analysis.leisure.len();
        analysis.exclude_duplicates(&excluded);
        assert_eq!(analysis.leisure.len(), before - 1);
    }

    #[test]
    fn test_classify_merchant_group() {
        let mut session = ImportSession::new();
        ingest(&mut session, "visa.csv", VISA_CSV);
        let mut analysis = session.analyze();

        // PAYBOX is the second group (file order).
        analysis.classify_unrecognized(1, Category::Entertainment);
        assert_eq!(analysis.unrecognized.len(), 1);
        let classified = analysis
            .leisure
            .iter()
            .find(|tx| tx.description.starts_with("PAYBOX FRIEND"))
            .unwrap();
        assert_eq!(
            kis_core::taxonomy::categorize(&classified.description),
            Category::Entertainment
        );
    }

    #[test]
    fn test_selected_commitments_respects_opt_out() {
        let mut session = ImportSession::new();
        ingest(&mut session, "visa.csv", VISA_CSV);
        let mut analysis = session.analyze();
        let total = analysis.commitments.len();
        assert!(total >= 2);

        analysis.commitments[0].selected = false;
        assert_eq!(analysis.selected_commitments().len(), total - 1);
    }

    #[test]
    fn test_empty_session_analyzes_to_nothing() {
        let analysis = ImportSession::new().analyze();
        assert!(analysis.leisure.is_empty());
        assert!(analysis.unrecognized.is_empty());
        assert!(analysis.commitments.is_empty());
        assert_eq!(analysis.baseline.average, 0.0);
    }
}
