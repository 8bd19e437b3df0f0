//! Answers submitted in one request, ready to be applied to review states.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub question_id: String,
    pub is_correct: bool,
}

/// All answers one user submitted together, in submission order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBatch {
    pub user_id: String,
    pub answers: Vec<AnsweredQuestion>,
}

impl AnswerBatch {
    pub fn new(user_id: impl Into<String>, answers: Vec<AnsweredQuestion>) -> Self {
        Self {
            user_id: user_id.into(),
            answers,
        }
    }

    /// One answer per distinct question id. When a question appears more than
    /// once the last submitted answer wins; the result keeps the order in
    /// which each question id first appeared.
    pub fn latest_by_question(&self) -> Vec<AnsweredQuestion> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut latest: Vec<AnsweredQuestion> = Vec::new();

        for answer in &self.answers {
            match positions.get(answer.question_id.as_str()) {
                Some(&idx) => latest[idx].is_correct = answer.is_correct,
                None => {
                    positions.insert(answer.question_id.as_str(), latest.len());
                    latest.push(answer.clone());
                }
            }
        }

        latest
    }

    pub fn question_ids(&self) -> Vec<String> {
        self.latest_by_question()
            .into_iter()
            .map(|a| a.question_id)
            .collect()
    }
}
