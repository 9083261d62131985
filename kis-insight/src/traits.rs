//! Closed-form trait scoring from interview answers and the semantic
//! analysis, producing the persisted records an advice feature reads later.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use kis_core::taxonomy::Category;

use crate::analyzer::{LifeConstraint, SemanticAnalysisResult};
use crate::interview::{
    AnswerValue, ConstraintStatus, ConvenienceReason, InterviewAnswer, SocialContext,
};

pub const TRAIT_CONVENIENCE_ADDICT: &str = "convenience_addict";
pub const TRAIT_SOCIAL_BUTTERFLY: &str = "social_butterfly";
pub const TRAIT_IMPULSE_SPENDER: &str = "impulse_spender";

/// Persisted behavioral score, upserted per trait id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTrait {
    pub trait_id: String,
    /// Always within [0, 1].
    pub score: f64,
    pub last_updated: NaiveDate,
}

/// Per-category priority configuration, upserted per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub category: Category,
    /// 1–10 emotional priority from the interview.
    pub emotional_priority: u8,
    /// Low joy means the category is actually functional spending.
    pub is_functional: bool,
    pub notes: Option<String>,
}

/// The three computed scores, before being stamped into records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitProfile {
    pub convenience: f64,
    pub social: f64,
    pub impulse: f64,
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn convenience_score(answers: &[InterviewAnswer], analysis: &SemanticAnalysisResult) -> f64 {
    let total_orders: usize = analysis.convenience_clusters.iter().map(|c| c.count).sum();
    // Frequency contributes at most 0.6; self-report supplies the rest.
    let mut score = (total_orders as f64 / 20.0).clamp(0.0, 0.6);

    let reason = answers.iter().find_map(|a| match a.value {
        AnswerValue::Convenience(reason) => Some(reason),
        _ => None,
    });
    score += match reason {
        Some(ConvenienceReason::PureConvenience) => 0.3,
        Some(ConvenienceReason::Mixed) => 0.15,
        _ => 0.0,
    };

    clamp01(score)
}

fn social_score(answers: &[InterviewAnswer], analysis: &SemanticAnalysisResult) -> f64 {
    let mut score = 0.0;
    for answer in answers {
        match answer.value {
            AnswerValue::Social(SocialContext::MostlyShared) => score += 0.3,
            AnswerValue::Social(SocialContext::Mixed) => score += 0.15,
            _ => {}
        }
    }
    // Outlier-heavy history leans social: big line items are usually shared.
    if analysis.outliers.len() > 3 {
        score += 0.1;
    }
    clamp01(score)
}

fn impulse_score(analysis: &SemanticAnalysisResult, leisure_count: usize) -> f64 {
    if leisure_count == 0 {
        return 0.0;
    }
    clamp01(analysis.outliers.len() as f64 / leisure_count as f64 * 3.0)
}

/// Compute the trait profile for one completed interview.
pub fn score_traits(
    answers: &[InterviewAnswer],
    analysis: &SemanticAnalysisResult,
    leisure_count: usize,
) -> TraitProfile {
    TraitProfile {
        convenience: convenience_score(answers, analysis),
        social: social_score(answers, analysis),
        impulse: impulse_score(analysis, leisure_count),
    }
}

/// Everything an answered interview persists: trait rows, category
/// priorities, and the constraints the user confirmed as ongoing.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewOutcome {
    pub traits: Vec<UserTrait>,
    pub category_configs: Vec<CategoryConfig>,
    pub confirmed_constraints: Vec<LifeConstraint>,
}

/// Turn answers + analysis into persistable records.
///
/// Emotional-ROI answers map straight into category configuration, with a
/// priority of 3 or less marking the category as functional rather than
/// emotionally driven. Constraints are kept only on an "ongoing" answer.
pub fn apply_interview(
    answers: &[InterviewAnswer],
    analysis: &SemanticAnalysisResult,
    leisure_count: usize,
    today: NaiveDate,
) -> InterviewOutcome {
    let profile = score_traits(answers, analysis, leisure_count);
    let traits = vec![
        UserTrait {
            trait_id: TRAIT_CONVENIENCE_ADDICT.to_string(),
            score: profile.convenience,
            last_updated: today,
        },
        UserTrait {
            trait_id: TRAIT_SOCIAL_BUTTERFLY.to_string(),
            score: profile.social,
            last_updated: today,
        },
        UserTrait {
            trait_id: TRAIT_IMPULSE_SPENDER.to_string(),
            score: profile.impulse,
            last_updated: today,
        },
    ];

    let category_configs = answers
        .iter()
        .filter_map(|answer| match (answer.value, answer.category) {
            (AnswerValue::Scale(priority), Some(category)) if (1..=10).contains(&priority) => {
                Some(CategoryConfig {
                    category,
                    emotional_priority: priority,
                    is_functional: priority <= 3,
                    notes: None,
                })
            }
            _ => None,
        })
        .collect();

    let confirmed_constraints = answers
        .iter()
        .filter_map(|answer| match (answer.value, answer.constraint) {
            (AnswerValue::Constraint(ConstraintStatus::Ongoing), Some(kind)) => analysis
                .life_constraints
                .iter()
                .find(|c| c.kind == kind)
                .cloned(),
            _ => None,
        })
        .collect();

    InterviewOutcome {
        traits,
        category_configs,
        confirmed_constraints,
    }
}
