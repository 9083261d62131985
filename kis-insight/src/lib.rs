//! kis-insight: behavioral layer over imported spending. Semantic
//! analysis (outliers, convenience clusters, life constraints), interview
//! generation, and trait scoring.

pub mod analyzer;
pub mod interview;
pub mod traits;

pub use analyzer::{
    analyze, CategorySpend, ConstraintKind, ConvenienceCluster, FlaggedTransaction,
    LifeConstraint, SemanticAnalysisResult,
};
pub use interview::{
    generate_questions, AnswerValue, ConstraintStatus, ConvenienceReason, InterviewAnswer,
    InterviewQuestion, QuestionKind, SocialContext,
};
pub use traits::{
    apply_interview, score_traits, CategoryConfig, InterviewOutcome, TraitProfile, UserTrait,
    TRAIT_CONVENIENCE_ADDICT, TRAIT_IMPULSE_SPENDER, TRAIT_SOCIAL_BUTTERFLY,
};
