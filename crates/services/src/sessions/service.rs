use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{
    AnswerRecord, Question, QuestionId, QuizSettings, SessionId, SessionReport,
};

use super::progress::SessionProgress;
use crate::error::SessionError;

/// Outcome of submitting one answer, for immediate feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub time_spent_secs: u32,
}

/// In-memory state of one quiz run.
///
/// Holds the ordered questions, a parallel list of answer slots, and the
/// bounded presentation index. The score is never stored: it is recomputed
/// from the slots, so resubmitting an answer can only overwrite, never
/// double-count.
pub struct QuizSession {
    id: SessionId,
    settings: QuizSettings,
    questions: Vec<Question>,
    answers: Vec<Option<String>>,
    time_spent: Vec<Option<u32>>,
    current: usize,
    started_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session over an already-planned question list.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        settings: QuizSettings,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let len = questions.len();
        Ok(Self {
            id: SessionId::generate(),
            settings,
            questions,
            answers: vec![None; len],
            time_spent: vec![None; len],
            current: 0,
            started_at,
            last_activity_at: started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Current presentation index, always within `[0, total]`.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Number of questions with a submitted answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of questions still without an answer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.questions.len().saturating_sub(self.answered_count())
    }

    /// Count of answer slots matching their question, recomputed on demand.
    #[must_use]
    pub fn correct_count(&self) -> u32 {
        let matches = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| {
                answer.as_deref().is_some_and(|guess| question.accepts(guess))
            })
            .count();
        u32::try_from(matches).unwrap_or(u32::MAX)
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            remaining: self.remaining(),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Record an answer for the question at the current index.
    ///
    /// Resubmitting overwrites the slot; scoring is derived from the slots,
    /// so this is idempotent for identical answers.
    ///
    /// `submitted_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already finished.
    pub fn submit_answer(
        &mut self,
        raw_answer: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmittedAnswer, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let Some(question) = self.questions.get(self.current) else {
            return Err(SessionError::Completed);
        };

        let is_correct = question.accepts(raw_answer);
        let elapsed = submitted_at
            .signed_duration_since(self.last_activity_at)
            .num_seconds();
        let time_spent_secs = u32::try_from(elapsed.max(0)).unwrap_or(u32::MAX);

        self.answers[self.current] = Some(raw_answer.to_string());
        self.time_spent[self.current] = Some(time_spent_secs);
        self.last_activity_at = submitted_at;

        Ok(SubmittedAnswer {
            question_id: question.id().clone(),
            is_correct,
            time_spent_secs,
        })
    }

    /// Move to the next question; stepping past the last one completes the
    /// session. Never mutates answers.
    ///
    /// Returns true when the session is complete afterwards.
    pub fn advance(&mut self, now: DateTime<Utc>) -> bool {
        if self.current < self.questions.len() {
            self.current += 1;
        }
        if self.current >= self.questions.len() && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.last_activity_at = now;
        self.is_complete()
    }

    /// Move to the previous question, floored at the first. Never mutates
    /// answers.
    pub fn go_back(&mut self, now: DateTime<Utc>) {
        self.current = self.current.saturating_sub(1);
        self.last_activity_at = now;
    }

    /// Project the session into its aggregate result.
    ///
    /// # Errors
    ///
    /// Propagates `ReportError` via `SessionError::Report`; with the
    /// length invariant held by construction this does not happen.
    pub fn report(&self) -> Result<SessionReport, SessionError> {
        Ok(SessionReport::from_answers(&self.questions, &self.answers)?)
    }

    /// Answer history rows for progress tracking, answered slots only.
    #[must_use]
    pub fn answer_records(&self) -> Vec<AnswerRecord> {
        self.questions
            .iter()
            .zip(&self.answers)
            .zip(&self.time_spent)
            .filter_map(|((question, answer), time_spent)| {
                let answer = answer.as_deref()?;
                Some(AnswerRecord::new(
                    question.id().clone(),
                    answer,
                    question.accepts(answer),
                    time_spent.unwrap_or(0),
                ))
            })
            .collect()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
