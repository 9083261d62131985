//! Fixed spending taxonomy with bilingual (English/Hebrew) keyword lists,
//! plus the hard non-leisure filter applied before categorization.

use serde::{Deserialize, Serialize};

use crate::transaction::NormalizedTransaction;

/// Spending categories, evaluated in declaration order. Every description
/// maps to exactly one category; no keyword match means [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FoodDining,
    Entertainment,
    Shopping,
    Housekeeping,
    Subscriptions,
    Other,
}

impl Category {
    /// All categories, in classification priority order.
    pub const ALL: [Category; 6] = [
        Category::FoodDining,
        Category::Entertainment,
        Category::Shopping,
        Category::Housekeeping,
        Category::Subscriptions,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FoodDining => "food_dining",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Housekeeping => "housekeeping",
            Category::Subscriptions => "subscriptions",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodDining => "Food & Dining",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Housekeeping => "Housekeeping",
            Category::Subscriptions => "Subscriptions",
            Category::Other => "Other",
        }
    }

    /// Bilingual keyword list matched against lowercased descriptions.
    /// Keywords are stored lowercase.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::FoodDining => &[
                "restaurant", "cafe", "coffee", "pizza", "burger", "sushi", "bar",
                "pub", "bakery", "food", "delivery", "wolt", "japanika", "10bis",
                "מסעדה", "בית קפה", "קפה", "פיצה", "בורגר", "סושי", "משלוח",
                "אוכל", "מאפייה",
            ],
            Category::Entertainment => &[
                "cinema", "movie", "theater", "concert", "show", "netflix", "spotify",
                "disney", "hbo", "apple tv", "youtube", "gaming", "steam", "playstation",
                "xbox", "nintendo", "yes", "hot",
                "gym", "fitness", "yoga", "pilates", "spa", "massage", "sport",
                "pool", "swimming", "book", "music", "art", "craft", "photography",
                "course", "class", "entertainment",
                "קולנוע", "סרט", "תיאטרון", "הופעה", "מופע",
                "חדר כושר", "יוגה", "ספא", "עיסוי", "בריכה", "שחייה",
                "ספר", "מוזיקה", "אומנות", "קורס", "שיעור",
            ],
            Category::Shopping => &[
                "amazon", "aliexpress", "shein", "zara", "h&m", "clothing", "shoes",
                "fashion", "mall", "store", "shop", "purchase", "asos",
                "קניון", "חנות", "ביגוד", "נעליים", "אופנה",
            ],
            Category::Housekeeping => &[
                "supermarket", "grocery", "market", "cleaning", "laundry", "housekeeping",
                "סופר", "מרקט", "שוק", "מכולת", "ניקיון", "כביסה",
                "uber", "gett", "bolt", "taxi", "yango",
                "מונית", "הסעה",
            ],
            Category::Subscriptions => &[
                "subscription", "monthly", "membership", "premium",
                "מנוי", "חברות",
            ],
            Category::Other => &[],
        }
    }
}

/// Keywords that unconditionally exclude a transaction from the leisure set,
/// regardless of any category match (rent, taxes, payroll, medical, ...).
pub const NON_LEISURE_KEYWORDS: &[&str] = &[
    // English
    "electric", "electricity", "rent", "tax", "mortgage", "insurance",
    "water", "gas", "salary", "payroll", "transfer", "atm", "withdrawal",
    "deposit", "refund", "municipal", "government", "health", "medical",
    "pharmacy", "doctor", "hospital", "school", "tuition", "daycare",
    "kindergarten", "parking fine", "court", "lawyer",
    // Hebrew
    "חשמל", "שכירות", "שכ\"ד", "ארנונה", "מס", "מיסים", "ביטוח",
    "משכנתא", "מים", "גז", "משכורת", "העברה", "כספומט", "משיכה",
    "הפקדה", "החזר", "עירייה", "ממשלת", "קופת חולים", "בית חולים",
    "רופא", "בית מרקחת", "גן ילדים", "בית ספר", "שכר לימוד",
    "ועד בית", "חניה", "קנס",
];

/// Deterministically categorize a description. First category whose keyword
/// list has a substring match wins; no match means `Other`.
pub fn categorize(description: &str) -> Category {
    let lower = description.to_lowercase();
    for category in Category::ALL {
        if category == Category::Other {
            continue;
        }
        if category.keywords().iter().any(|kw| lower.contains(kw)) {
            return category;
        }
    }
    Category::Other
}

/// Hard filter: matches mean the transaction is not discretionary spend.
pub fn is_non_leisure(description: &str) -> bool {
    let lower = description.to_lowercase();
    NON_LEISURE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Result of running the leisure filter over a normalized batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeisureSplit {
    /// Discretionary transactions with a recognized category.
    pub leisure: Vec<NormalizedTransaction>,
    /// Discretionary transactions landing in `Other`: routed to the user
    /// for manual classification, not dropped.
    pub unrecognized: Vec<NormalizedTransaction>,
}

/// Partition a batch: non-leisure rows are discarded, `Other` rows go to
/// the unrecognized bucket, everything else is leisure.
pub fn split_leisure(transactions: Vec<NormalizedTransaction>) -> LeisureSplit {
    let mut split = LeisureSplit::default();
    for tx in transactions {
        if is_non_leisure(&tx.description) {
            continue;
        }
        if categorize(&tx.description) == Category::Other {
            split.unrecognized.push(tx);
        } else {
            split.leisure.push(tx);
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(description: &str) -> NormalizedTransaction {
        NormalizedTransaction::new(
            50.0,
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            description,
        )
    }

    #[test]
    fn test_categorize_english() {
        assert_eq!(categorize("WOLT DELIVERY TLV"), Category::FoodDining);
        assert_eq!(categorize("NETFLIX.COM"), Category::Entertainment);
        assert_eq!(categorize("ZARA DIZENGOFF"), Category::Shopping);
    }

    #[test]
    fn test_categorize_hebrew() {
        assert_eq!(categorize("מסעדה איטלקית"), Category::FoodDining);
        assert_eq!(categorize("קניון עזריאלי"), Category::Shopping);
        assert_eq!(categorize("מנוי חודשי"), Category::Subscriptions);
    }

    #[test]
    fn test_categorize_is_total() {
        assert_eq!(categorize(""), Category::Other);
        assert_eq!(categorize("XYZZY 123"), Category::Other);
    }

    #[test]
    fn test_declaration_order_wins() {
        // "wolt" (food) appears before housekeeping's "bolt" could ever match.
        assert_eq!(categorize("wolt market"), Category::FoodDining);
    }

    #[test]
    fn test_non_leisure_overrides_category() {
        // "ביטוח" is non-leisure even though "מנוי" would match subscriptions.
        assert!(is_non_leisure("מנוי ביטוח חודשי"));
        let split = split_leisure(vec![tx("מנוי ביטוח חודשי")]);
        assert!(split.leisure.is_empty());
        assert!(split.unrecognized.is_empty());
    }

    #[test]
    fn test_split_routes_other_to_unrecognized() {
        let split = split_leisure(vec![tx("PAYBOX FRIEND"), tx("CAFE GREG")]);
        assert_eq!(split.leisure.len(), 1);
        assert_eq!(split.unrecognized.len(), 1);
        assert_eq!(split.unrecognized[0].description, "PAYBOX FRIEND");
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&Category::FoodDining).unwrap();
        assert_eq!(json, "\"food_dining\"");
        assert_eq!(Category::FoodDining.as_str(), "food_dining");
    }
}
