//! Semantic pass over the leisure transactions of one import: statistical
//! outliers per category, convenience-delivery clusters, and life-constraint
//! evidence. All closed-form heuristics, no learned models.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use kis_core::taxonomy::{categorize, Category};
use kis_core::transaction::NormalizedTransaction;

/// Flag amounts more than 80% above the category median.
const OUTLIER_THRESHOLD: f64 = 0.8;

/// Minimum transactions per category before outlier statistics apply.
const MIN_CATEGORY_SAMPLE: usize = 3;

/// Delivery/convenience providers, English and Hebrew spellings.
const CONVENIENCE_PROVIDERS: &[&str] = &[
    "wolt", "bolt food", "10bis", "japanika", "dominos", "pizza hut",
    "uber eats", "tenbis", "cibus", "mishloha",
    "וולט", "בולט", "תן ביס", "משלוחה",
];

/// Recurring life contexts inferred from spending evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Pet,
    Academic,
    Hobby,
    Wellness,
    Professional,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 5] = [
        ConstraintKind::Pet,
        ConstraintKind::Academic,
        ConstraintKind::Hobby,
        ConstraintKind::Wellness,
        ConstraintKind::Professional,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConstraintKind::Pet => "Pet Owner",
            ConstraintKind::Academic => "Student / Learner",
            ConstraintKind::Hobby => "Active Hobbyist",
            ConstraintKind::Wellness => "Wellness Focused",
            ConstraintKind::Professional => "Professional Tools",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            ConstraintKind::Pet => &[
                "pet", "vet", "veterinary", "dog", "cat", "petshop", "pet shop",
                "חיות", "וטרינר", "כלב", "חתול", "חנות חיות",
            ],
            ConstraintKind::Academic => &[
                "university", "college", "course", "tuition", "textbook", "udemy", "coursera",
                "אוניברסיטה", "מכללה", "קורס", "שכר לימוד", "לימודים",
            ],
            ConstraintKind::Hobby => &[
                "art supply", "music store", "instrument", "craft", "photography",
                "אומנות", "מוזיקה", "כלי נגינה", "צילום", "יצירה",
            ],
            ConstraintKind::Wellness => &[
                "gym", "fitness", "yoga", "pilates", "spa", "massage", "therapy", "psycholog",
                "חדר כושר", "כושר", "יוגה", "פילאטיס", "ספא", "עיסוי", "טיפול", "פסיכולוג",
            ],
            ConstraintKind::Professional => &[
                "coworking", "wework", "mindspace", "office", "software", "license",
                "חלל עבודה", "משרד", "תוכנה", "רישיון",
            ],
        }
    }
}

/// A transaction flagged as statistically unusual for its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedTransaction {
    pub transaction: NormalizedTransaction,
    /// Human-readable explanation of why it was flagged.
    pub details: String,
    pub category_median: f64,
}

/// ≥3 orders from the same delivery provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvenienceCluster {
    pub provider: String,
    pub count: usize,
    pub total_amount: f64,
    pub average_amount: f64,
    pub transactions: Vec<NormalizedTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeConstraint {
    pub kind: ConstraintKind,
    pub label: String,
    /// Distinct evidence descriptions, at most five kept as examples.
    pub evidence: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: Category,
    pub total: f64,
    pub count: usize,
}

/// Output of one analysis pass. Transient: feeds question generation only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticAnalysisResult {
    pub outliers: Vec<FlaggedTransaction>,
    pub convenience_clusters: Vec<ConvenienceCluster>,
    pub life_constraints: Vec<LifeConstraint>,
    pub top_categories: Vec<CategorySpend>,
}

fn median(values: &mut Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

fn installment_noise_res() -> &'static [Regex; 4] {
    static RES: OnceLock<[Regex; 4]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            Regex::new(r"\s*תשלום\s*\d+\s*מתוך\s*\d+").expect("invalid merchant regex"),
            Regex::new(r"\s*\d+/\d+\s*תשלומים").expect("invalid merchant regex"),
            Regex::new(r"\s*תש\s*\d+/\d+").expect("invalid merchant regex"),
            Regex::new(r"(?i)\s+\d+\s*of\s+\d+").expect("invalid merchant regex"),
        ]
    })
}

fn trailing_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+\d+\s*$").expect("invalid merchant regex"))
}

/// Strip installment counters and trailing numbers so "ISHIR INSURANCE 5"
/// and "ISHIR INSURANCE 6" collapse to the same merchant key.
fn normalize_merchant_name(description: &str) -> String {
    let mut name = description.to_string();
    for re in installment_noise_res() {
        name = re.replace_all(&name, "").into_owned();
    }
    name = trailing_number_re().replace(&name, "").into_owned();
    name.trim().to_lowercase()
}

fn detect_outliers(transactions: &[NormalizedTransaction]) -> Vec<FlaggedTransaction> {
    let mut by_category: HashMap<Category, Vec<&NormalizedTransaction>> = HashMap::new();
    for tx in transactions {
        by_category.entry(categorize(&tx.description)).or_default().push(tx);
    }

    let mut raw_flagged = Vec::new();
    for category in Category::ALL {
        let Some(txs) = by_category.get(&category) else {
            continue;
        };
        if category == Category::Other || txs.len() < MIN_CATEGORY_SAMPLE {
            continue;
        }
        let mut amounts: Vec<f64> = txs.iter().map(|t| t.amount).collect();
        let category_median = median(&mut amounts);
        let threshold = category_median * (1.0 + OUTLIER_THRESHOLD);

        for tx in txs {
            if tx.amount > threshold {
                let percent =
                    (((tx.amount - category_median) / category_median) * 100.0).round();
                raw_flagged.push(FlaggedTransaction {
                    transaction: (*tx).clone(),
                    details: format!(
                        "₪{:.0} is {}% above the {} median of ₪{:.0}",
                        tx.amount,
                        percent,
                        category.as_str(),
                        category_median
                    ),
                    category_median,
                });
            }
        }
    }

    // One flag per merchant: keep the highest amount.
    let mut by_merchant: Vec<(String, FlaggedTransaction)> = Vec::new();
    for flagged in raw_flagged {
        let key = normalize_merchant_name(&flagged.transaction.description);
        match by_merchant.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                if flagged.transaction.amount > existing.transaction.amount {
                    *existing = flagged;
                }
            }
            None => by_merchant.push((key, flagged)),
        }
    }
    by_merchant.into_iter().map(|(_, flagged)| flagged).collect()
}

fn detect_convenience_clusters(
    transactions: &[NormalizedTransaction],
) -> Vec<ConvenienceCluster> {
    let mut clusters: HashMap<&'static str, Vec<&NormalizedTransaction>> = HashMap::new();
    for tx in transactions {
        let lower = tx.description.to_lowercase();
        if let Some(provider) = CONVENIENCE_PROVIDERS.iter().find(|p| lower.contains(**p)).copied()
        {
            clusters.entry(provider).or_default().push(tx);
        }
    }

    let mut result: Vec<ConvenienceCluster> = clusters
        .into_iter()
        .filter(|(_, txs)| txs.len() >= 3)
        .map(|(provider, txs)| {
            let total: f64 = txs.iter().map(|t| t.amount).sum();
            ConvenienceCluster {
                provider: provider.to_string(),
                count: txs.len(),
                total_amount: total,
                average_amount: total / txs.len() as f64,
                transactions: txs.into_iter().cloned().collect(),
            }
        })
        .collect();
    result.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    result
}

fn detect_life_constraints(transactions: &[NormalizedTransaction]) -> Vec<LifeConstraint> {
    let mut constraints = Vec::new();

    for kind in ConstraintKind::ALL {
        let mut evidence: Vec<String> = Vec::new();
        for tx in transactions {
            let lower = tx.description.to_lowercase();
            if kind.keywords().iter().any(|kw| lower.contains(kw))
                && !evidence.contains(&tx.description)
            {
                evidence.push(tx.description.clone());
            }
        }
        if evidence.len() >= 2 {
            let confidence = (evidence.len() as f64 / 5.0).min(1.0);
            evidence.truncate(5);
            constraints.push(LifeConstraint {
                kind,
                label: kind.label().to_string(),
                evidence,
                confidence,
            });
        }
    }
    constraints
}

fn top_categories(transactions: &[NormalizedTransaction]) -> Vec<CategorySpend> {
    let mut by_category: HashMap<Category, CategorySpend> = HashMap::new();
    for tx in transactions {
        let category = categorize(&tx.description);
        if category == Category::Other {
            continue;
        }
        let entry = by_category.entry(category).or_insert(CategorySpend {
            category,
            total: 0.0,
            count: 0,
        });
        entry.total += tx.amount;
        entry.count += 1;
    }
    let mut spends: Vec<CategorySpend> = by_category.into_values().collect();
    spends.sort_by(|a, b| b.total.total_cmp(&a.total));
    spends.truncate(5);
    spends
}

/// Run the full semantic pass over the leisure subset of an import.
pub fn analyze(transactions: &[NormalizedTransaction]) -> SemanticAnalysisResult {
    SemanticAnalysisResult {
        outliers: detect_outliers(transactions),
        convenience_clusters: detect_convenience_clusters(transactions),
        life_constraints: detect_life_constraints(transactions),
        top_categories: top_categories(transactions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(description: &str, amount: f64) -> NormalizedTransaction {
        NormalizedTransaction::new(
            amount,
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            description,
        )
    }

    #[test]
    fn test_outlier_worked_example() {
        // Median of [40, 42, 45, 130] is 43.5; threshold 78.3.
        let txs = vec![
            tx("cafe aroma", 40.0),
            tx("cafe nimrod", 42.0),
            tx("pizza roma", 45.0),
            tx("sushi bar omakase", 130.0),
        ];
        let outliers = detect_outliers(&txs);
        assert_eq!(outliers.len(), 1);
        let flag = &outliers[0];
        assert_eq!(flag.transaction.amount, 130.0);
        assert_eq!(flag.category_median, 43.5);
        assert!(flag.details.contains("199%"), "details: {}", flag.details);
        assert!(flag.details.contains("food_dining"));
    }

    #[test]
    fn test_small_categories_are_skipped() {
        let txs = vec![tx("cafe aroma", 10.0), tx("pizza roma", 500.0)];
        assert!(detect_outliers(&txs).is_empty());
    }

    #[test]
    fn test_outliers_deduplicated_per_merchant() {
        let txs = vec![
            tx("cafe aroma", 40.0),
            tx("cafe nimrod", 42.0),
            tx("pizza roma", 45.0),
            tx("ISHIR RESTAURANT 5", 200.0),
            tx("ISHIR RESTAURANT 6", 260.0),
        ];
        let outliers = detect_outliers(&txs);
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].transaction.amount, 260.0);
    }

    #[test]
    fn test_convenience_cluster_needs_three_orders() {
        let two = vec![tx("WOLT HERZLIYA", 60.0), tx("WOLT HERZLIYA", 70.0)];
        assert!(detect_convenience_clusters(&two).is_empty());

        let three = vec![
            tx("WOLT HERZLIYA", 60.0),
            tx("WOLT RAMAT GAN", 70.0),
            tx("wolt tlv", 80.0),
        ];
        let clusters = detect_convenience_clusters(&three);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].provider, "wolt");
        assert_eq!(clusters[0].count, 3);
        assert_eq!(clusters[0].total_amount, 210.0);
        assert_eq!(clusters[0].average_amount, 70.0);
    }

    #[test]
    fn test_life_constraint_needs_two_distinct_evidence() {
        let repeated = vec![tx("VET CLINIC", 150.0), tx("VET CLINIC", 150.0)];
        assert!(detect_life_constraints(&repeated).is_empty());

        let distinct = vec![
            tx("VET CLINIC", 150.0),
            tx("PETSHOP REHOVOT", 90.0),
            tx("חנות חיות בלב", 45.0),
        ];
        let constraints = detect_life_constraints(&distinct);
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].kind, ConstraintKind::Pet);
        assert_eq!(constraints[0].label, "Pet Owner");
        assert_eq!(constraints[0].evidence.len(), 3);
        assert!((constraints[0].confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_top_categories_excludes_other_and_caps_at_five() {
        let txs = vec![
            tx("cafe aroma", 100.0),
            tx("netflix", 50.0),
            tx("zara", 75.0),
            tx("unmatched merchant", 999.0),
        ];
        let top = top_categories(&txs);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].category, Category::FoodDining);
        assert_eq!(top[0].total, 100.0);
        assert!(top.iter().all(|c| c.category != Category::Other));
    }

    #[test]
    fn test_empty_input_yields_empty_analysis() {
        assert_eq!(analyze(&[]), SemanticAnalysisResult::default());
    }
}
