use thiserror::Error;

use crate::model::grade::Grade;
use crate::model::ids::QuestionId;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("answers list length ({answers}) does not match questions ({questions})")]
    LengthMismatch { questions: usize, answers: usize },

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// Aggregate result of a quiz run.
///
/// Scoring is always recomputed from the answer slots, so resubmitting an
/// answer for an index can never double-count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    total: u32,
    correct: u32,
    accuracy: u8,
    missed: Vec<QuestionId>,
}

impl SessionReport {
    /// Reduce a question list and its parallel answer slots into totals.
    ///
    /// Unanswered slots count as incorrect. An empty question list yields an
    /// accuracy of 0 rather than dividing by zero.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::LengthMismatch` if the two lists differ in
    /// length, or `ReportError::TooManyQuestions` if the count cannot fit in
    /// `u32`.
    pub fn from_answers(
        questions: &[Question],
        answers: &[Option<String>],
    ) -> Result<Self, ReportError> {
        if questions.len() != answers.len() {
            return Err(ReportError::LengthMismatch {
                questions: questions.len(),
                answers: answers.len(),
            });
        }
        let total = u32::try_from(questions.len()).map_err(|_| ReportError::TooManyQuestions {
            len: questions.len(),
        })?;

        let mut correct = 0_u32;
        let mut missed = Vec::new();
        for (question, answer) in questions.iter().zip(answers) {
            let is_correct = answer
                .as_deref()
                .is_some_and(|guess| question.accepts(guess));
            if is_correct {
                correct = correct.saturating_add(1);
            } else {
                missed.push(question.id().clone());
            }
        }

        Ok(Self {
            total,
            correct,
            accuracy: percentage(correct, total),
            missed,
        })
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Percentage of correct answers, rounded to the nearest integer.
    #[must_use]
    pub fn accuracy(&self) -> u8 {
        self.accuracy
    }

    /// Questions not answered correctly, in presentation order, for review.
    #[must_use]
    pub fn missed(&self) -> &[QuestionId] {
        &self.missed
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }

    /// Letter grade derived from the accuracy percentage.
    #[must_use]
    pub fn grade(&self) -> Grade {
        Grade::from_accuracy(i32::from(self.accuracy))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percentage(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (f64::from(correct) * 100.0 / f64::from(total)).round() as u8
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::{Difficulty, QuestionDraft};

    fn question(id: &str, answer: &str) -> Question {
        QuestionDraft {
            id: id.into(),
            prompt: format!("Spell the word for {answer}"),
            spoken_prompt: None,
            difficulty: Difficulty::Easy,
            choices: vec![answer.into(), "owl".into(), "frog".into()],
            answer: answer.into(),
            hint: None,
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn report_counts_mixed_answers() {
        let questions = vec![
            question("q1", "cat"),
            question("q2", "DOG "),
            question("q3", "bird"),
            question("q4", "fish"),
        ];
        let answers = vec![
            Some("cat".to_string()),
            Some("dog".to_string()),
            None,
            Some("fish".to_string()),
        ];

        let report = SessionReport::from_answers(&questions, &answers).unwrap();
        assert_eq!(report.total(), 4);
        assert_eq!(report.correct(), 3);
        assert_eq!(report.accuracy(), 75);
        assert_eq!(report.missed(), &[QuestionId::new("q3")]);
    }

    #[test]
    fn empty_report_has_zero_accuracy() {
        let report = SessionReport::from_answers(&[], &[]).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.accuracy(), 0);
        assert!(!report.is_perfect());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let questions = vec![question("q1", "cat")];
        let err = SessionReport::from_answers(&questions, &[]).unwrap_err();
        assert_eq!(
            err,
            ReportError::LengthMismatch {
                questions: 1,
                answers: 0
            }
        );
    }

    #[test]
    fn accuracy_rounds_to_nearest() {
        let questions = vec![
            question("q1", "cat"),
            question("q2", "dog"),
            question("q3", "owl"),
        ];
        let answers = vec![Some("cat".to_string()), None, None];
        let report = SessionReport::from_answers(&questions, &answers).unwrap();
        // 1/3 rounds to 33
        assert_eq!(report.accuracy(), 33);

        let answers = vec![Some("cat".to_string()), Some("dog".to_string()), None];
        let report = SessionReport::from_answers(&questions, &answers).unwrap();
        // 2/3 rounds to 67
        assert_eq!(report.accuracy(), 67);
    }

    #[test]
    fn perfect_run_reports_grade_s() {
        let questions = vec![question("q1", "cat")];
        let answers = vec![Some("CAT".to_string())];
        let report = SessionReport::from_answers(&questions, &answers).unwrap();
        assert!(report.is_perfect());
        assert_eq!(report.grade(), Grade::S);
        assert!(report.missed().is_empty());
    }
}
