use thiserror::Error;

use crate::model::report::SessionReport;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatsError {
    #[error("correct answers ({correct}) exceed questions answered ({answered})")]
    CountMismatch { answered: u32, correct: u32 },

    #[error("best accuracy ({0}) cannot exceed 100")]
    InvalidAccuracy(u8),
}

/// Cumulative play statistics across all completed sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifetimeStats {
    sessions_completed: u32,
    questions_answered: u32,
    correct_answers: u32,
    best_accuracy: u8,
}

impl LifetimeStats {
    /// Rehydrate stats from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `StatsError` when the persisted counts are inconsistent.
    pub fn from_persisted(
        sessions_completed: u32,
        questions_answered: u32,
        correct_answers: u32,
        best_accuracy: u8,
    ) -> Result<Self, StatsError> {
        if correct_answers > questions_answered {
            return Err(StatsError::CountMismatch {
                answered: questions_answered,
                correct: correct_answers,
            });
        }
        if best_accuracy > 100 {
            return Err(StatsError::InvalidAccuracy(best_accuracy));
        }

        Ok(Self {
            sessions_completed,
            questions_answered,
            correct_answers,
            best_accuracy,
        })
    }

    /// Fold a completed session report into the running totals.
    pub fn record(&mut self, report: &SessionReport) {
        self.sessions_completed = self.sessions_completed.saturating_add(1);
        self.questions_answered = self.questions_answered.saturating_add(report.total());
        self.correct_answers = self.correct_answers.saturating_add(report.correct());
        self.best_accuracy = self.best_accuracy.max(report.accuracy());
    }

    #[must_use]
    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    #[must_use]
    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn best_accuracy(&self) -> u8 {
        self.best_accuracy
    }

    /// Overall accuracy across every answered question, 0 when none.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn overall_accuracy(&self) -> u8 {
        if self.questions_answered == 0 {
            return 0;
        }
        (f64::from(self.correct_answers) * 100.0 / f64::from(self.questions_answered)).round()
            as u8
    }
}
