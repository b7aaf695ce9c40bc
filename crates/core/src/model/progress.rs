use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// One answered question as reported to the progress-tracking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub answer: String,
    pub is_correct: bool,
    /// Seconds spent on the question before the answer was submitted.
    pub time_spent_secs: u32,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        answer: impl Into<String>,
        is_correct: bool,
        time_spent_secs: u32,
    ) -> Self {
        Self {
            question_id,
            answer: answer.into(),
            is_correct,
            time_spent_secs,
        }
    }
}
