//! Database operations for review scheduling
//!
//! Handles SQLite initialization, the question bank lookup used for subject
//! filters, and one review-state record per (user, question) pair.

use crate::error::{Error, Result};
use crate::models::scheduler::{MAX_STAGE, compute_next_review};
use crate::models::{
    AnswerBatch, DueQuery, DueReview, PartialPrior, Question, ReviewState, ReviewSummary,
    StoredReview,
};
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound on question ids bound into a single `IN (...)` list.
const MAX_IDS_PER_QUERY: usize = 500;

/// Opens (or creates) the database at `path` and ensures the schema exists.
pub fn init_database(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path.as_ref())?;
    conn.busy_timeout(Duration::from_secs(5))?;
    init_schema(&conn)?;
    info!(path = %path.as_ref().display(), "Review database ready");
    Ok(conn)
}

/// Creates tables and indexes if they are missing.
pub fn init_schema(conn: &Connection) -> Result<()> {
    // Question bank, only what the due query filters on
    conn.execute(
        "CREATE TABLE IF NOT EXISTS questions (
            id TEXT PRIMARY KEY,
            subject TEXT NOT NULL,
            prompt TEXT NOT NULL DEFAULT ''
        )",
        (),
    )?;

    // Review states; timestamps are epoch milliseconds
    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_states (
            user_id TEXT NOT NULL,
            question_id TEXT NOT NULL,
            stage_index INTEGER NOT NULL,
            correct_streak INTEGER NOT NULL DEFAULT 0,
            total_reviews INTEGER NOT NULL DEFAULT 0,
            next_review_at INTEGER NOT NULL,
            last_reviewed_at INTEGER NOT NULL,
            PRIMARY KEY (user_id, question_id)
        )",
        (),
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_review_states_due
         ON review_states (user_id, next_review_at)",
        (),
    )?;

    Ok(())
}

fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or(Error::InvalidTimestamp(ms))
}

fn stage_from_db(stage: i64) -> usize {
    usize::try_from(stage).map_or(0, |s| s.min(MAX_STAGE))
}

fn counter_from_db(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Raw review_states row before timestamp conversion.
struct ReviewRow {
    user_id: String,
    question_id: String,
    stage_index: i64,
    correct_streak: i64,
    total_reviews: i64,
    next_review_at: i64,
    last_reviewed_at: i64,
}

impl ReviewRow {
    const COLUMNS: &'static str = "user_id, question_id, stage_index, correct_streak, \
                                   total_reviews, next_review_at, last_reviewed_at";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            question_id: row.get(1)?,
            stage_index: row.get(2)?,
            correct_streak: row.get(3)?,
            total_reviews: row.get(4)?,
            next_review_at: row.get(5)?,
            last_reviewed_at: row.get(6)?,
        })
    }

    fn into_stored(self) -> Result<StoredReview> {
        Ok(StoredReview {
            user_id: self.user_id,
            question_id: self.question_id,
            state: ReviewState {
                stage_index: stage_from_db(self.stage_index),
                correct_streak: counter_from_db(self.correct_streak),
                total_reviews: counter_from_db(self.total_reviews),
                next_review_at: from_millis(self.next_review_at)?,
                last_reviewed_at: from_millis(self.last_reviewed_at)?,
            },
        })
    }
}

/// Inserts a question or replaces its subject and prompt.
pub fn add_question(question: &Question, conn: &Connection) -> Result<()> {
    if question.id.trim().is_empty() {
        return Err(Error::InvalidInput("question id must not be empty".into()));
    }
    conn.execute(
        "INSERT INTO questions (id, subject, prompt) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET subject = excluded.subject, prompt = excluded.prompt",
        params![question.id, question.subject, question.prompt],
    )?;
    debug!(question_id = %question.id, subject = %question.subject, "Question stored");
    Ok(())
}

/// Retrieves the review state for one pair, if it has ever been evaluated.
pub fn get_review_state(
    user_id: &str,
    question_id: &str,
    conn: &Connection,
) -> Result<Option<StoredReview>> {
    let sql = format!(
        "SELECT {} FROM review_states WHERE user_id = ?1 AND question_id = ?2",
        ReviewRow::COLUMNS
    );
    conn.query_row(&sql, params![user_id, question_id], ReviewRow::from_row)
        .optional()?
        .map(ReviewRow::into_stored)
        .transpose()
}

/// Retrieves every review state of a user, ordered by question id.
pub fn list_user_reviews(user_id: &str, conn: &Connection) -> Result<Vec<StoredReview>> {
    let sql = format!(
        "SELECT {} FROM review_states WHERE user_id = ?1 ORDER BY question_id ASC",
        ReviewRow::COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![user_id], ReviewRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(ReviewRow::into_stored).collect()
}

/// Reads the prior counters for all `question_ids` of a user at once.
///
/// Ids without a record are simply absent from the map; the scheduler
/// treats them as never reviewed.
pub fn get_prior_states(
    user_id: &str,
    question_ids: &[String],
    conn: &Connection,
) -> Result<HashMap<String, PartialPrior>> {
    let mut priors = HashMap::with_capacity(question_ids.len());

    for chunk in question_ids.chunks(MAX_IDS_PER_QUERY) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "SELECT question_id, stage_index, correct_streak, total_reviews
             FROM review_states
             WHERE user_id = ? AND question_id IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql)?;
        let bound = std::iter::once(user_id).chain(chunk.iter().map(String::as_str));
        let rows = stmt.query_map(params_from_iter(bound), |row| {
            Ok((
                row.get::<_, String>(0)?,
                PartialPrior {
                    stage_index: row.get(1)?,
                    correct_streak: row.get(2)?,
                    total_reviews: row.get(3)?,
                },
            ))
        })?;
        for row in rows {
            let (question_id, prior) = row?;
            priors.insert(question_id, prior);
        }
    }

    Ok(priors)
}

/// Inserts or overwrites the review state keyed by (user, question).
pub fn upsert_review_state(review: &StoredReview, conn: &Connection) -> Result<()> {
    let state = &review.state;
    conn.execute(
        "INSERT INTO review_states
            (user_id, question_id, stage_index, correct_streak, total_reviews, next_review_at, last_reviewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(user_id, question_id) DO UPDATE SET
            stage_index = excluded.stage_index,
            correct_streak = excluded.correct_streak,
            total_reviews = excluded.total_reviews,
            next_review_at = excluded.next_review_at,
            last_reviewed_at = excluded.last_reviewed_at",
        params![
            review.user_id,
            review.question_id,
            i64::try_from(state.stage_index).unwrap_or(i64::MAX),
            state.correct_streak,
            state.total_reviews,
            to_millis(state.next_review_at),
            to_millis(state.last_reviewed_at),
        ],
    )?;

    debug!(
        user_id = %review.user_id,
        question_id = %review.question_id,
        stage = state.stage_index,
        next_review_at = %state.next_review_at,
        "Review state upserted"
    );
    Ok(())
}

fn validate_batch(batch: &AnswerBatch) -> Result<()> {
    if batch.user_id.trim().is_empty() {
        return Err(Error::InvalidInput("user id must not be empty".into()));
    }
    if batch.answers.iter().any(|a| a.question_id.trim().is_empty()) {
        return Err(Error::InvalidInput("question id must not be empty".into()));
    }
    Ok(())
}

/// Applies a batch of answers for one user.
///
/// Prior states are fetched in one read, then each distinct question gets one
/// scheduler evaluation and one upsert. Duplicate question ids resolve to the
/// last submitted answer. The whole batch commits in a single transaction.
pub fn record_answers(
    batch: &AnswerBatch,
    now: DateTime<Utc>,
    conn: &mut Connection,
) -> Result<Vec<StoredReview>> {
    validate_batch(batch)?;

    let answers = batch.latest_by_question();
    if answers.is_empty() {
        return Ok(Vec::new());
    }
    if answers.len() < batch.answers.len() {
        debug!(
            user_id = %batch.user_id,
            submitted = batch.answers.len(),
            distinct = answers.len(),
            "Duplicate question ids in batch, keeping last answers"
        );
    }

    // Rows keep milliseconds; evaluate at that precision so the returned
    // states equal what is read back
    let now = now.trunc_subsecs(3);

    let tx = conn.transaction()?;
    let question_ids: Vec<String> = answers.iter().map(|a| a.question_id.clone()).collect();
    let priors = get_prior_states(&batch.user_id, &question_ids, &tx)?;

    let mut updated = Vec::with_capacity(answers.len());
    for answer in answers {
        let state = compute_next_review(priors.get(&answer.question_id), answer.is_correct, now);
        let review = StoredReview {
            user_id: batch.user_id.clone(),
            question_id: answer.question_id,
            state,
        };
        upsert_review_state(&review, &tx)?;
        updated.push(review);
    }
    tx.commit()?;

    info!(
        user_id = %batch.user_id,
        updated = updated.len(),
        "Answer batch recorded"
    );
    Ok(updated)
}

/// Retrieves reviews due for a user
///
/// Returns states where next_review_at <= now, optionally restricted to one
/// subject, ordered by next_review_at (most overdue first).
pub fn get_due_reviews(
    user_id: &str,
    query: &DueQuery,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<Vec<DueReview>> {
    if query.limit == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(
        "SELECT r.question_id, q.subject, r.stage_index, r.next_review_at
         FROM review_states r
         LEFT JOIN questions q ON q.id = r.question_id
         WHERE r.user_id = ?1 AND r.next_review_at <= ?2
           AND (?3 IS NULL OR q.subject = ?3)
         ORDER BY r.next_review_at ASC, r.question_id ASC
         LIMIT ?4",
    )?;

    let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map(
            params![user_id, to_millis(now), query.subject, limit],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(question_id, subject, stage, next_review_at)| {
            Ok(DueReview {
                question_id,
                subject,
                stage_index: stage_from_db(stage),
                next_review_at: from_millis(next_review_at)?,
            })
        })
        .collect()
}

/// Number of due reviews per user, users with nothing due omitted.
pub fn count_due_by_user(now: DateTime<Utc>, conn: &Connection) -> Result<Vec<(String, u32)>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, COUNT(*) FROM review_states
         WHERE next_review_at <= ?1
         GROUP BY user_id
         ORDER BY user_id ASC",
    )?;
    let counts = stmt
        .query_map(params![to_millis(now)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .map(|row| row.map(|(user, count)| (user, counter_from_db(count))))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(counts)
}

/// Stage distribution and due count of one user.
pub fn review_summary(user_id: &str, now: DateTime<Utc>, conn: &Connection) -> Result<ReviewSummary> {
    let mut stmt = conn.prepare(
        "SELECT stage_index, COUNT(*),
                SUM(CASE WHEN next_review_at <= ?2 THEN 1 ELSE 0 END)
         FROM review_states
         WHERE user_id = ?1
         GROUP BY stage_index",
    )?;
    let rows = stmt
        .query_map(params![user_id, to_millis(now)], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut summary = ReviewSummary::default();
    for (stage, count, due) in rows {
        let count = counter_from_db(count);
        summary.by_stage[stage_from_db(stage)] += count;
        summary.tracked += count;
        summary.due += counter_from_db(due);
    }
    summary.mastered = summary.by_stage[MAX_STAGE];
    Ok(summary)
}

/// Removes every review state of a user. Returns the number of rows deleted.
pub fn delete_user_reviews(user_id: &str, conn: &Connection) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM review_states WHERE user_id = ?1",
        params![user_id],
    )?;
    info!(user_id = %user_id, deleted, "User review data removed");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnsweredQuestion;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn question(id: &str, subject: &str) -> Question {
        Question {
            id: id.to_string(),
            subject: subject.to_string(),
            prompt: String::new(),
        }
    }

    fn batch(user: &str, answers: &[(&str, bool)]) -> AnswerBatch {
        AnswerBatch::new(
            user,
            answers
                .iter()
                .map(|(id, ok)| AnsweredQuestion {
                    question_id: id.to_string(),
                    is_correct: *ok,
                })
                .collect(),
        )
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = test_conn();
        assert!(init_schema(&conn).is_ok());
    }

    #[test]
    fn test_first_answer_creates_state() {
        let mut conn = test_conn();
        let now = at("2024-01-01T00:00:00Z");

        let updated = record_answers(&batch("u1", &[("q1", true)]), now, &mut conn).unwrap();
        assert_eq!(updated.len(), 1);

        let stored = get_review_state("u1", "q1", &conn).unwrap().unwrap();
        assert_eq!(stored.state.stage_index, 0);
        assert_eq!(stored.state.correct_streak, 1);
        assert_eq!(stored.state.total_reviews, 1);
        assert_eq!(stored.state.next_review_at, at("2024-01-02T00:00:00Z"));
        assert_eq!(stored.state.last_reviewed_at, now);
        assert_eq!(stored, updated[0]);
    }

    #[test]
    fn test_returned_states_match_stored_at_sub_millisecond_now() {
        let mut conn = test_conn();
        let now = at("2024-01-01T10:20:30.123456789Z");

        let updated =
            record_answers(&batch("u1", &[("q1", true), ("q2", false)]), now, &mut conn).unwrap();
        for review in &updated {
            let stored = get_review_state("u1", &review.question_id, &conn)
                .unwrap()
                .unwrap();
            assert_eq!(&stored, review);
        }
        assert_eq!(updated[0].state.last_reviewed_at, at("2024-01-01T10:20:30.123Z"));
        assert_eq!(updated[0].state.next_review_at, at("2024-01-02T10:20:30.123Z"));
    }

    #[test]
    fn test_answers_build_on_prior_state() {
        let mut conn = test_conn();
        let day1 = at("2024-01-01T00:00:00Z");
        let day2 = at("2024-01-02T00:00:00Z");
        let day5 = at("2024-01-05T00:00:00Z");

        record_answers(&batch("u1", &[("q1", true)]), day1, &mut conn).unwrap();
        record_answers(&batch("u1", &[("q1", true)]), day2, &mut conn).unwrap();
        let state = get_review_state("u1", "q1", &conn).unwrap().unwrap().state;
        assert_eq!(state.stage_index, 1);
        assert_eq!(state.next_review_at, at("2024-01-05T00:00:00Z"));

        record_answers(&batch("u1", &[("q1", false)]), day5, &mut conn).unwrap();
        let state = get_review_state("u1", "q1", &conn).unwrap().unwrap().state;
        assert_eq!(state.stage_index, 0);
        assert_eq!(state.correct_streak, 0);
        assert_eq!(state.total_reviews, 3);
        assert_eq!(state.next_review_at, at("2024-01-06T00:00:00Z"));
    }

    #[test]
    fn test_duplicate_question_in_batch_last_wins() {
        let mut conn = test_conn();
        let now = at("2024-01-01T00:00:00Z");

        let updated = record_answers(
            &batch("u1", &[("q1", true), ("q2", true), ("q1", false)]),
            now,
            &mut conn,
        )
        .unwrap();
        assert_eq!(updated.len(), 2);

        let q1 = get_review_state("u1", "q1", &conn).unwrap().unwrap().state;
        assert_eq!(q1.correct_streak, 0);
        // Evaluated once, not once per duplicate
        assert_eq!(q1.total_reviews, 1);
    }

    #[test]
    fn test_invalid_batch_writes_nothing() {
        let mut conn = test_conn();
        let now = at("2024-01-01T00:00:00Z");

        let result = record_answers(&batch("u1", &[("q1", true), ("  ", true)]), now, &mut conn);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(get_review_state("u1", "q1", &conn).unwrap().is_none());

        let result = record_answers(&batch("", &[("q1", true)]), now, &mut conn);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut conn = test_conn();
        let updated =
            record_answers(&batch("u1", &[]), at("2024-01-01T00:00:00Z"), &mut conn).unwrap();
        assert!(updated.is_empty());
    }

    #[test]
    fn test_states_are_per_user() {
        let mut conn = test_conn();
        let now = at("2024-01-01T00:00:00Z");
        record_answers(&batch("u1", &[("q1", true)]), now, &mut conn).unwrap();
        record_answers(&batch("u2", &[("q1", false)]), now, &mut conn).unwrap();

        assert_eq!(get_review_state("u1", "q1", &conn).unwrap().unwrap().state.correct_streak, 1);
        assert_eq!(get_review_state("u2", "q1", &conn).unwrap().unwrap().state.correct_streak, 0);
    }

    #[test]
    fn test_prior_states_batch_read() {
        let mut conn = test_conn();
        let now = at("2024-01-01T00:00:00Z");
        record_answers(&batch("u1", &[("q1", true), ("q2", false)]), now, &mut conn).unwrap();

        let ids = vec!["q1".to_string(), "q2".to_string(), "q3".to_string()];
        let priors = get_prior_states("u1", &ids, &conn).unwrap();
        assert_eq!(priors.len(), 2);
        assert_eq!(priors["q1"].stage_index, Some(0));
        assert_eq!(priors["q1"].correct_streak, Some(1));
        assert_eq!(priors["q2"].correct_streak, Some(0));
        assert!(!priors.contains_key("q3"));
    }

    #[test]
    fn test_due_query_is_inclusive_and_ordered() {
        let mut conn = test_conn();
        record_answers(&batch("u1", &[("q-late", true)]), at("2024-01-03T00:00:00Z"), &mut conn)
            .unwrap();
        record_answers(&batch("u1", &[("q-early", true)]), at("2024-01-01T00:00:00Z"), &mut conn)
            .unwrap();
        record_answers(&batch("u1", &[("q-mid", false)]), at("2024-01-02T00:00:00Z"), &mut conn)
            .unwrap();

        // q-late becomes due exactly at 2024-01-04T00:00:00Z
        let due = get_due_reviews("u1", &DueQuery::default(), at("2024-01-04T00:00:00Z"), &conn)
            .unwrap();
        let ids: Vec<_> = due.iter().map(|d| d.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q-early", "q-mid", "q-late"]);

        let due = get_due_reviews(
            "u1",
            &DueQuery::default(),
            at("2024-01-03T23:59:59.999Z"),
            &conn,
        )
        .unwrap();
        assert_eq!(due.len(), 2);
    }

    #[test]
    fn test_due_query_subject_filter_and_limit() {
        let mut conn = test_conn();
        add_question(&question("q1", "audit"), &conn).unwrap();
        add_question(&question("q2", "tax"), &conn).unwrap();
        add_question(&question("q3", "audit"), &conn).unwrap();
        record_answers(
            &batch("u1", &[("q1", true), ("q2", true), ("q3", true), ("q4", true)]),
            at("2024-01-01T00:00:00Z"),
            &mut conn,
        )
        .unwrap();
        let now = at("2024-02-01T00:00:00Z");

        let audit = DueQuery {
            subject: Some("audit".to_string()),
            limit: 10,
        };
        let due = get_due_reviews("u1", &audit, now, &conn).unwrap();
        let ids: Vec<_> = due.iter().map(|d| d.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q3"]);
        assert!(due.iter().all(|d| d.subject.as_deref() == Some("audit")));

        let unfiltered = get_due_reviews("u1", &DueQuery { subject: None, limit: 10 }, now, &conn)
            .unwrap();
        assert_eq!(unfiltered.len(), 4);
        assert_eq!(unfiltered[3].subject, None);

        let limited = get_due_reviews("u1", &DueQuery { subject: None, limit: 2 }, now, &conn)
            .unwrap();
        assert_eq!(limited.len(), 2);

        let none = get_due_reviews("u1", &DueQuery { subject: None, limit: 0 }, now, &conn)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_add_question_replaces_subject() {
        let conn = test_conn();
        add_question(&question("q1", "audit"), &conn).unwrap();
        add_question(&question("q1", "law"), &conn).unwrap();
        let subject: String = conn
            .query_row("SELECT subject FROM questions WHERE id = 'q1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(subject, "law");
        assert!(add_question(&question("", "law"), &conn).is_err());
    }

    #[test]
    fn test_count_due_by_user() {
        let mut conn = test_conn();
        let now = at("2024-01-01T00:00:00Z");
        record_answers(&batch("bob", &[("q1", true), ("q2", false)]), now, &mut conn).unwrap();
        record_answers(&batch("alice", &[("q1", true)]), now, &mut conn).unwrap();
        record_answers(&batch("carol", &[("q1", true)]), now, &mut conn).unwrap();
        record_answers(&batch("carol", &[("q1", true)]), at("2024-01-02T00:00:00Z"), &mut conn)
            .unwrap();

        let counts = count_due_by_user(at("2024-01-02T00:00:00Z"), &conn).unwrap();
        assert_eq!(
            counts,
            vec![("alice".to_string(), 1), ("bob".to_string(), 2)]
        );
    }

    #[test]
    fn test_review_summary() {
        let mut conn = test_conn();
        let now = at("2024-01-01T00:00:00Z");
        let stored = StoredReview {
            user_id: "u1".to_string(),
            question_id: "q-master".to_string(),
            state: compute_next_review(
                Some(&PartialPrior {
                    stage_index: Some(4),
                    correct_streak: Some(9),
                    total_reviews: Some(9),
                }),
                true,
                now,
            ),
        };
        upsert_review_state(&stored, &conn).unwrap();
        record_answers(&batch("u1", &[("q1", true), ("q2", false)]), now, &mut conn).unwrap();

        let summary = review_summary("u1", at("2024-01-02T00:00:00Z"), &conn).unwrap();
        assert_eq!(summary.tracked, 3);
        assert_eq!(summary.due, 2);
        assert_eq!(summary.mastered, 1);
        assert_eq!(summary.by_stage, [2, 0, 0, 0, 1]);

        assert_eq!(review_summary("nobody", now, &conn).unwrap(), ReviewSummary::default());
    }

    #[test]
    fn test_delete_user_reviews_only_touches_that_user() {
        let mut conn = test_conn();
        let now = at("2024-01-01T00:00:00Z");
        record_answers(&batch("u1", &[("q1", true), ("q2", true)]), now, &mut conn).unwrap();
        record_answers(&batch("u2", &[("q1", true)]), now, &mut conn).unwrap();

        assert_eq!(delete_user_reviews("u1", &conn).unwrap(), 2);
        assert!(list_user_reviews("u1", &conn).unwrap().is_empty());
        assert_eq!(list_user_reviews("u2", &conn).unwrap().len(), 1);
    }

    #[test]
    fn test_init_database_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.sqlite3");
        let mut conn = init_database(&path).unwrap();
        record_answers(&batch("u1", &[("q1", true)]), at("2024-01-01T00:00:00Z"), &mut conn)
            .unwrap();
        drop(conn);

        let conn = init_database(&path).unwrap();
        assert_eq!(list_user_reviews("u1", &conn).unwrap().len(), 1);
    }
}
