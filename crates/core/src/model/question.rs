use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Questions with fewer choices than this cannot be presented as a
/// multiple-choice prompt.
pub const MIN_CHOICES: usize = 3;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Stable string form used for storage columns and wire payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {raw}")]
pub struct ParseDifficultyError {
    pub raw: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ParseDifficultyError { raw: other.into() }),
        }
    }
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question record as returned by the question service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub spoken_prompt: Option<String>,
    pub difficulty: Difficulty,
    pub choices: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for a blank id, blank prompt, fewer than
    /// `MIN_CHOICES` answer choices, or a blank correct answer.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.id.trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.choices.len() < MIN_CHOICES {
            return Err(QuestionError::TooFewChoices {
                got: self.choices.len(),
            });
        }
        if self.answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }

        Ok(Question {
            id: QuestionId::new(self.id.trim()),
            prompt: self.prompt,
            spoken_prompt: normalize_optional(self.spoken_prompt),
            difficulty: self.difficulty,
            choices: self.choices,
            answer: self.answer,
            hint: normalize_optional(self.hint),
        })
    }
}

/// A validated quiz question. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    spoken_prompt: Option<String>,
    difficulty: Difficulty,
    choices: Vec<String>,
    answer: String,
    hint: Option<String>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Text to hand to a text-to-speech host for audio prompts, when present.
    #[must_use]
    pub fn spoken_prompt(&self) -> Option<&str> {
        self.spoken_prompt.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Whether a submitted answer matches the expected one.
    ///
    /// Comparison is whitespace-trimmed and case-insensitive, so young
    /// typists are not penalized for stray spaces or capitals.
    #[must_use]
    pub fn accepts(&self, guess: &str) -> bool {
        normalize(guess) == normalize(&self.answer)
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least 3 answer choices, got {got}")]
    TooFewChoices { got: usize },

    #[error("question answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: &str) -> QuestionDraft {
        QuestionDraft {
            id: id.into(),
            prompt: "Which animal says meow?".into(),
            spoken_prompt: None,
            difficulty: Difficulty::Easy,
            choices: vec!["cat".into(), "dog".into(), "bird".into()],
            answer: "cat".into(),
            hint: None,
        }
    }

    #[test]
    fn draft_validates_into_question() {
        let question = draft("q-1").validate().unwrap();
        assert_eq!(question.id().as_str(), "q-1");
        assert_eq!(question.choices().len(), 3);
        assert_eq!(question.answer(), "cat");
    }

    #[test]
    fn blank_id_is_rejected() {
        let bad = draft("   ");
        assert_eq!(bad.validate().unwrap_err(), QuestionError::EmptyId);
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut bad = draft("q-1");
        bad.prompt = " \t".into();
        assert_eq!(bad.validate().unwrap_err(), QuestionError::EmptyPrompt);
    }

    #[test]
    fn two_choices_are_rejected() {
        let mut bad = draft("q-1");
        bad.choices.pop();
        assert_eq!(
            bad.validate().unwrap_err(),
            QuestionError::TooFewChoices { got: 2 }
        );
    }

    #[test]
    fn blank_answer_is_rejected() {
        let mut bad = draft("q-1");
        bad.answer = String::new();
        assert_eq!(bad.validate().unwrap_err(), QuestionError::EmptyAnswer);
    }

    #[test]
    fn blank_hint_normalizes_to_none() {
        let mut with_hint = draft("q-1");
        with_hint.hint = Some("  ".into());
        assert_eq!(with_hint.validate().unwrap().hint(), None);
    }

    #[test]
    fn accepts_ignores_case_and_whitespace() {
        let question = draft("q-1").validate().unwrap();
        assert!(question.accepts("cat"));
        assert!(question.accepts("  CAT "));
        assert!(question.accepts("Cat"));
        assert!(!question.accepts("dog"));
        assert!(!question.accepts(""));
    }

    #[test]
    fn difficulty_round_trips_through_str() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(difficulty.as_str().parse::<Difficulty>().unwrap(), difficulty);
        }
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
