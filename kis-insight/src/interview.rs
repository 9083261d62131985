//! Interview generation: one question per detected signal, nothing more.
//! An empty analysis produces an empty interview.

use serde::{Deserialize, Serialize};

use kis_core::taxonomy::{categorize, Category};
use kis_core::transaction::NormalizedTransaction;

use crate::analyzer::{ConstraintKind, LifeConstraint, SemanticAnalysisResult};

/// Categories where an emotional-ROI question makes sense. Groceries and
/// subscriptions are functional; nobody is asked how much joy they bring.
const JOY_ELIGIBLE: [Category; 3] = [
    Category::FoodDining,
    Category::Entertainment,
    Category::Shopping,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SocialFilter,
    EmotionalRoi,
    ConstraintConfirm,
}

pub const SOCIAL_OPTIONS: &[&str] = &["Mostly shared / social", "Mostly personal", "A mix of both"];
pub const CONVENIENCE_OPTIONS: &[&str] =
    &["Pure convenience", "No time / energy to cook", "A mix of both"];
pub const CONSTRAINT_OPTIONS: &[&str] =
    &["Yes, it's ongoing", "No, it was temporary", "It's occasional"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewQuestion {
    pub id: String,
    pub kind: QuestionKind,
    pub prompt: String,
    pub category: Option<Category>,
    pub related_transactions: Vec<NormalizedTransaction>,
    pub constraint: Option<LifeConstraint>,
    /// Choice labels for the UI; empty for 1–10 scale questions.
    pub options: Vec<&'static str>,
}

/// Answers to social-filter questions about who the spending was with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialContext {
    MostlyShared,
    MostlyPersonal,
    Mixed,
}

/// Answers to the delivery-habit question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvenienceReason {
    PureConvenience,
    NoEnergyToCook,
    Mixed,
}

/// Answers to constraint-confirmation questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintStatus {
    Ongoing,
    Temporary,
    Occasional,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Social(SocialContext),
    Convenience(ConvenienceReason),
    Constraint(ConstraintStatus),
    /// Emotional ROI on a 1–10 scale.
    Scale(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewAnswer {
    pub question_id: String,
    pub category: Option<Category>,
    pub constraint: Option<ConstraintKind>,
    pub value: AnswerValue,
}

fn social_filter_questions(
    analysis: &SemanticAnalysisResult,
    next_id: &mut impl FnMut() -> String,
) -> Vec<InterviewQuestion> {
    let mut questions = Vec::new();

    let outliers_in = |category: Category| -> Vec<NormalizedTransaction> {
        analysis
            .outliers
            .iter()
            .filter(|o| categorize(&o.transaction.description) == category)
            .map(|o| o.transaction.clone())
            .collect()
    };

    let dining = outliers_in(Category::FoodDining);
    if !dining.is_empty() {
        questions.push(InterviewQuestion {
            id: next_id(),
            kind: QuestionKind::SocialFilter,
            prompt: "I noticed some higher-than-usual restaurant spending. Are these typically shared social meals or personal dining?".to_string(),
            category: Some(Category::FoodDining),
            related_transactions: dining,
            constraint: None,
            options: SOCIAL_OPTIONS.to_vec(),
        });
    }

    let entertainment = outliers_in(Category::Entertainment);
    if !entertainment.is_empty() {
        questions.push(InterviewQuestion {
            id: next_id(),
            kind: QuestionKind::SocialFilter,
            prompt: "You have some notable entertainment expenses. Are these social outings or personal entertainment?".to_string(),
            category: Some(Category::Entertainment),
            related_transactions: entertainment,
            constraint: None,
            options: SOCIAL_OPTIONS.to_vec(),
        });
    }

    if !analysis.convenience_clusters.is_empty() {
        let providers: Vec<&str> = analysis
            .convenience_clusters
            .iter()
            .map(|c| c.provider.as_str())
            .collect();
        let total_orders: usize = analysis.convenience_clusters.iter().map(|c| c.count).sum();
        questions.push(InterviewQuestion {
            id: next_id(),
            kind: QuestionKind::SocialFilter,
            prompt: format!(
                "You ordered delivery {} times ({}). Is this mainly for convenience, or are there days you simply can't cook?",
                total_orders,
                providers.join(", ")
            ),
            category: Some(Category::Housekeeping),
            related_transactions: Vec::new(),
            constraint: None,
            options: CONVENIENCE_OPTIONS.to_vec(),
        });
    }

    questions
}

fn emotional_roi_questions(
    analysis: &SemanticAnalysisResult,
    next_id: &mut impl FnMut() -> String,
) -> Vec<InterviewQuestion> {
    analysis
        .top_categories
        .iter()
        .filter(|spend| JOY_ELIGIBLE.contains(&spend.category))
        .map(|spend| InterviewQuestion {
            id: next_id(),
            kind: QuestionKind::EmotionalRoi,
            prompt: format!(
                "How much joy does \"{}\" spending bring you? (1 = no joy, 10 = essential to my happiness)",
                spend.category.label()
            ),
            category: Some(spend.category),
            related_transactions: Vec::new(),
            constraint: None,
            options: Vec::new(),
        })
        .collect()
}

fn constraint_questions(
    analysis: &SemanticAnalysisResult,
    next_id: &mut impl FnMut() -> String,
) -> Vec<InterviewQuestion> {
    analysis
        .life_constraints
        .iter()
        .map(|constraint| InterviewQuestion {
            id: next_id(),
            kind: QuestionKind::ConstraintConfirm,
            prompt: format!(
                "We detected spending that suggests: \"{}\". Is this an ongoing commitment in your life?",
                constraint.label
            ),
            category: None,
            related_transactions: Vec::new(),
            constraint: Some(constraint.clone()),
            options: CONSTRAINT_OPTIONS.to_vec(),
        })
        .collect()
}

/// Build the interview for one analysis. Question count is fully
/// data-driven and can be zero.
pub fn generate_questions(analysis: &SemanticAnalysisResult) -> Vec<InterviewQuestion> {
    let mut counter = 0;
    let mut next_id = move || {
        counter += 1;
        format!("q_{counter}")
    };

    let mut questions = social_filter_questions(analysis, &mut next_id);
    questions.extend(emotional_roi_questions(analysis, &mut next_id));
    questions.extend(constraint_questions(analysis, &mut next_id));
    questions
}
