//! Question bank entry. Only the fields the review queries need are kept.
use super::scheduler::REVIEW_INTERVAL_DAYS;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub prompt: String,
}

/// Filter and size limit for the due-review query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DueQuery {
    pub subject: Option<String>,
    pub limit: usize,
}

impl Default for DueQuery {
    fn default() -> Self {
        Self {
            subject: None,
            limit: 20,
        }
    }
}

/// A review state whose `next_review_at` has passed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueReview {
    pub question_id: String,
    pub subject: Option<String>,
    pub stage_index: usize,
    pub next_review_at: chrono::DateTime<chrono::Utc>,
}

/// Per-user snapshot for the analytics dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub tracked: u32,
    pub due: u32,
    pub mastered: u32,
    pub by_stage: [u32; REVIEW_INTERVAL_DAYS.len()],
}

/// Outcome of removing a user's review data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalReport {
    pub user_id: String,
    pub deleted: usize,
}
