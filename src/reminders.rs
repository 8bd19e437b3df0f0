//! Due-review reminder digests.
//!
//! Builds the email/push content for learners with reviews waiting. Sending
//! is left to whichever dispatcher consumes these.

use crate::database::db::count_due_by_user;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub user_id: String,
    pub due_count: u32,
    pub subject_line: String,
    pub body: String,
}

impl Reminder {
    pub fn new(user_id: impl Into<String>, due_count: u32) -> Self {
        let noun = if due_count == 1 { "question" } else { "questions" };
        Self {
            user_id: user_id.into(),
            due_count,
            subject_line: format!("{due_count} {noun} ready for review"),
            body: format!(
                "You have {due_count} {noun} due for revision. \
                 A short review session now keeps them fresh for the exam."
            ),
        }
    }
}

/// One reminder per user with at least `min_due` reviews due at `now`
/// (a threshold of 0 is treated as 1), ordered by user id.
pub fn build_reminders(now: DateTime<Utc>, min_due: u32, conn: &Connection) -> Result<Vec<Reminder>> {
    let threshold = min_due.max(1);
    let reminders: Vec<Reminder> = count_due_by_user(now, conn)?
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .map(|(user_id, count)| Reminder::new(user_id, count))
        .collect();

    info!(recipients = reminders.len(), threshold, "Reminder digests built");
    Ok(reminders)
}
