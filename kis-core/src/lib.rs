//! kis-core: canonical transaction model and money math for the Kis
//! spending pipeline (taxonomy, commitments, dedup, baseline, daily
//! budget, month-end maintenance, and commitment projection).

pub mod baseline;
pub mod big_event;
pub mod budget;
pub mod commitments;
pub mod dates;
pub mod dedup;
pub mod month_end;
pub mod projection;
pub mod taxonomy;
pub mod transaction;

pub use baseline::{calculate_baseline, Baseline, BASELINE_REDUCTION_FACTOR};
pub use big_event::{recalculate_all, total_amortization, BigEvent};
pub use budget::{
    calculate_daily_budget, compute_snapshot, spent_in_month, spent_on, BudgetSettings,
    BudgetSnapshot,
};
pub use commitments::{
    detect_installments, detect_subscriptions, merchant_key, total_active, Commitment,
    CommitmentKind, DetectedCommitment,
};
pub use dates::{
    days_remaining_in_month, last_day_of_month, month_key, month_window_start, yesterday,
};
pub use dedup::{
    apply_exclusions, collapse_exact_duplicates, description_similarity, find_duplicates,
    DedupConfig, DuplicateMatch, DEFAULT_LOOKBACK_MONTHS,
};
pub use month_end::{month_end_surplus, run_month_transition, MonthTransition};
pub use projection::{
    project_commitments, MonthProjection, ProjectedCommitment, DEFAULT_HORIZON_MONTHS,
};
pub use taxonomy::{
    categorize, is_non_leisure, split_leisure, Category, LeisureSplit, NON_LEISURE_KEYWORDS,
};
pub use transaction::{NormalizedTransaction, RawRow, StoredTransaction};
