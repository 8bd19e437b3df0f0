//! JSON import/export of a user's review states.
//! Lets a learner's progress be saved to a file and restored into another
//! database.

use crate::database::db::{list_user_reviews, upsert_review_state};
use crate::error::{Error, Result};
use crate::models::{MAX_STAGE, ReviewState, StoredReview, scheduled_review_at};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedReview {
    pub question_id: String,
    #[serde(flatten)]
    pub state: ReviewState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewExport {
    pub user_id: String,
    pub exported_at: DateTime<Utc>,
    pub reviews: Vec<ExportedReview>,
}

/// Collects every review state of `user_id` into an export document.
pub fn build_export(user_id: &str, now: DateTime<Utc>, conn: &Connection) -> Result<ReviewExport> {
    let reviews = list_user_reviews(user_id, conn)?
        .into_iter()
        .map(|r| ExportedReview {
            question_id: r.question_id,
            state: r.state,
        })
        .collect();

    Ok(ReviewExport {
        user_id: user_id.to_string(),
        exported_at: now,
        reviews,
    })
}

/// Exports a user's review states to a JSON file at the specified path.
/// Returns the number of exported reviews.
pub fn export_reviews_to_path(
    user_id: &str,
    now: DateTime<Utc>,
    path: impl AsRef<Path>,
    conn: &Connection,
) -> Result<usize> {
    let export = build_export(user_id, now, conn)?;
    let json_string = serde_json::to_string_pretty(&export)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json_string.as_bytes())?;

    info!(
        user_id = %user_id,
        reviews = export.reviews.len(),
        path = %path.as_ref().display(),
        "Review states exported"
    );
    Ok(export.reviews.len())
}

/// Reads an export document without touching the database.
pub fn read_export(path: impl AsRef<Path>) -> Result<ReviewExport> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let export: ReviewExport = serde_json::from_str(&contents)?;
    validate_export(&export)?;
    Ok(export)
}

fn validate_export(export: &ReviewExport) -> Result<()> {
    if export.user_id.trim().is_empty() {
        return Err(Error::InvalidInput("export has no user id".into()));
    }
    for review in &export.reviews {
        if review.question_id.trim().is_empty() {
            return Err(Error::InvalidInput("export contains an empty question id".into()));
        }
        if review.state.stage_index > MAX_STAGE {
            return Err(Error::InvalidInput(format!(
                "stage {} of question '{}' is outside the interval table",
                review.state.stage_index, review.question_id
            )));
        }
        let expected = scheduled_review_at(review.state.last_reviewed_at, review.state.stage_index);
        if review.state.next_review_at != expected {
            return Err(Error::InvalidInput(format!(
                "next review of question '{}' is {}, stage {} schedules it for {}",
                review.question_id, review.state.next_review_at, review.state.stage_index, expected
            )));
        }
    }
    Ok(())
}

/// Imports an export file, overwriting the states it contains.
/// Everything is written in one transaction. Returns the number of reviews
/// imported.
pub fn import_reviews(path: impl AsRef<Path>, conn: &mut Connection) -> Result<usize> {
    let export = read_export(path.as_ref())?;

    let tx = conn.transaction()?;
    for review in &export.reviews {
        let stored = StoredReview {
            user_id: export.user_id.clone(),
            question_id: review.question_id.clone(),
            state: review.state.clone(),
        };
        upsert_review_state(&stored, &tx)?;
    }
    tx.commit()?;

    info!(
        user_id = %export.user_id,
        reviews = export.reviews.len(),
        path = %path.as_ref().display(),
        "Review states imported"
    );
    Ok(export.reviews.len())
}
