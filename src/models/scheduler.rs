//! Fixed-table spaced repetition scheduler.
//!
//! Each review state sits on a stage that indexes [`REVIEW_INTERVAL_DAYS`]:
//! - A correct answer moves the pair up one stage, capped at the last entry
//! - An incorrect answer drops it back to stage 0 and clears the streak
//! - The next review is always `now` plus the interval of the new stage
//!
//! Past the last stage the cadence stays at the final interval; longer
//! retention is modelled by extending the table, not by changing the rules.

use super::review_state::{NEVER_REVIEWED, PartialPrior, ReviewState};
use chrono::{DateTime, Duration, Utc};

/// Days until the next review, indexed by stage.
pub const REVIEW_INTERVAL_DAYS: [i64; 5] = [1, 3, 7, 14, 30];

/// Highest reachable stage.
pub const MAX_STAGE: usize = REVIEW_INTERVAL_DAYS.len() - 1;

/// Interval for `stage`, clamped to the table.
pub fn interval_for_stage(stage: usize) -> Duration {
    Duration::days(REVIEW_INTERVAL_DAYS[stage.min(MAX_STAGE)])
}

/// When a pair last reviewed at `reviewed_at` on `stage` is due again.
/// Saturates at the latest representable time.
pub fn scheduled_review_at(reviewed_at: DateTime<Utc>, stage: usize) -> DateTime<Utc> {
    reviewed_at
        .checked_add_signed(interval_for_stage(stage))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Calculates the state that follows `previous` after one evaluation.
/// A missing `previous` (or missing fields) means "never reviewed".
pub fn compute_next_review(
    previous: Option<&PartialPrior>,
    is_correct: bool,
    now: DateTime<Utc>,
) -> ReviewState {
    let prior = previous
        .copied()
        .unwrap_or_default()
        .resolve(&NEVER_REVIEWED, MAX_STAGE);

    let (stage_index, correct_streak) = if is_correct {
        // resolve() keeps stage_index in [-1, MAX_STAGE]
        let stage = usize::try_from(prior.stage_index + 1).unwrap_or(0);
        (stage.min(MAX_STAGE), prior.correct_streak.saturating_add(1))
    } else {
        (0, 0)
    };

    ReviewState {
        stage_index,
        correct_streak,
        total_reviews: prior.total_reviews.saturating_add(1),
        next_review_at: scheduled_review_at(now, stage_index),
        last_reviewed_at: now,
    }
}

/// Same as [`compute_next_review`] evaluated at the wall clock.
pub fn compute_next_review_now(previous: Option<&PartialPrior>, is_correct: bool) -> ReviewState {
    compute_next_review(previous, is_correct, Utc::now())
}
