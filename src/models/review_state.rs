//! Review state kept for every (user, question) pair.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State after at least one evaluation. `stage_index` always indexes
/// `REVIEW_INTERVAL_DAYS`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub stage_index: usize,
    pub correct_streak: u32,
    pub total_reviews: u32,
    pub next_review_at: DateTime<Utc>,
    pub last_reviewed_at: DateTime<Utc>,
}

impl ReviewState {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}

/// Prior counters fed to the scheduler. `stage_index == -1` means the pair
/// has never been reviewed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriorState {
    pub stage_index: i64,
    pub correct_streak: u32,
    pub total_reviews: u32,
}

/// Defaults applied to every field missing from a prior state.
pub const NEVER_REVIEWED: PriorState = PriorState {
    stage_index: -1,
    correct_streak: 0,
    total_reviews: 0,
};

/// Prior state as it arrives from storage or a request body, any field of
/// which may be absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialPrior {
    pub stage_index: Option<i64>,
    pub correct_streak: Option<i64>,
    pub total_reviews: Option<i64>,
}

impl PartialPrior {
    /// Fills absent fields from `defaults` and coerces out-of-range values:
    /// stages are clamped to `[-1, max_stage]`, counters to `[0, u32::MAX]`.
    pub fn resolve(&self, defaults: &PriorState, max_stage: usize) -> PriorState {
        let max_stage = i64::try_from(max_stage).unwrap_or(i64::MAX);
        PriorState {
            stage_index: self
                .stage_index
                .unwrap_or(defaults.stage_index)
                .clamp(-1, max_stage),
            correct_streak: self
                .correct_streak
                .map_or(defaults.correct_streak, clamp_counter),
            total_reviews: self
                .total_reviews
                .map_or(defaults.total_reviews, clamp_counter),
        }
    }
}

impl From<&ReviewState> for PartialPrior {
    fn from(state: &ReviewState) -> Self {
        Self {
            stage_index: i64::try_from(state.stage_index).ok(),
            correct_streak: Some(state.correct_streak.into()),
            total_reviews: Some(state.total_reviews.into()),
        }
    }
}

fn clamp_counter(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// A review state together with the pair it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReview {
    pub user_id: String,
    pub question_id: String,
    #[serde(flatten)]
    pub state: ReviewState,
}
