use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::CollectionId;
use crate::model::question::Difficulty;

/// Questions presented per session when enough valid ones are available.
pub const DEFAULT_SESSION_SIZE: u32 = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("session size must be > 0")]
    InvalidSessionSize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {raw}")]
pub struct ParseModeError {
    pub kind: &'static str,
    pub raw: String,
}

//
// ─── MODES ─────────────────────────────────────────────────────────────────────
//

/// How a question is presented to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    Text,
    Audio,
}

impl PromptMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptMode::Text => "text",
            PromptMode::Audio => "audio",
        }
    }
}

impl FromStr for PromptMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(PromptMode::Text),
            "audio" => Ok(PromptMode::Audio),
            other => Err(ParseModeError {
                kind: "prompt mode",
                raw: other.into(),
            }),
        }
    }
}

/// How the player answers: picking a choice or typing the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    Choice,
    Fill,
}

impl AnswerMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerMode::Choice => "choice",
            AnswerMode::Fill => "fill",
        }
    }
}

impl FromStr for AnswerMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "choice" => Ok(AnswerMode::Choice),
            "fill" => Ok(AnswerMode::Fill),
            other => Err(ParseModeError {
                kind: "answer mode",
                raw: other.into(),
            }),
        }
    }
}

/// Policy for ordering fetched questions before presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionOrder {
    /// Preserve fetch order.
    Sequential,
    /// Uniform random permutation.
    Random,
}

impl QuestionOrder {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionOrder::Sequential => "sequential",
            QuestionOrder::Random => "random",
        }
    }
}

impl FromStr for QuestionOrder {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(QuestionOrder::Sequential),
            "random" => Ok(QuestionOrder::Random),
            other => Err(ParseModeError {
                kind: "question order",
                raw: other.into(),
            }),
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QuestionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Unvalidated quiz settings, as edited by a host or loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettingsDraft {
    pub prompt_mode: PromptMode,
    pub answer_mode: AnswerMode,
    pub difficulty: Difficulty,
    pub collection: Option<CollectionId>,
    pub order: QuestionOrder,
    pub session_size: u32,
}

impl Default for QuizSettingsDraft {
    fn default() -> Self {
        Self {
            prompt_mode: PromptMode::Text,
            answer_mode: AnswerMode::Choice,
            difficulty: Difficulty::Easy,
            collection: None,
            order: QuestionOrder::Sequential,
            session_size: DEFAULT_SESSION_SIZE,
        }
    }
}

impl QuizSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft into usable settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError::InvalidSessionSize` for a zero session size.
    pub fn validate(self) -> Result<QuizSettings, QuizSettingsError> {
        if self.session_size == 0 {
            return Err(QuizSettingsError::InvalidSessionSize);
        }

        Ok(QuizSettings {
            prompt_mode: self.prompt_mode,
            answer_mode: self.answer_mode,
            difficulty: self.difficulty,
            collection: self.collection,
            order: self.order,
            session_size: self.session_size,
        })
    }
}

/// Configuration for one quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    prompt_mode: PromptMode,
    answer_mode: AnswerMode,
    difficulty: Difficulty,
    collection: Option<CollectionId>,
    order: QuestionOrder,
    session_size: u32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            prompt_mode: PromptMode::Text,
            answer_mode: AnswerMode::Choice,
            difficulty: Difficulty::Easy,
            collection: None,
            order: QuestionOrder::Sequential,
            session_size: DEFAULT_SESSION_SIZE,
        }
    }
}

impl QuizSettings {
    #[must_use]
    pub fn prompt_mode(&self) -> PromptMode {
        self.prompt_mode
    }

    #[must_use]
    pub fn answer_mode(&self) -> AnswerMode {
        self.answer_mode
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn collection(&self) -> Option<&CollectionId> {
        self.collection.as_ref()
    }

    #[must_use]
    pub fn order(&self) -> QuestionOrder {
        self.order
    }

    #[must_use]
    pub fn session_size(&self) -> u32 {
        self.session_size
    }

    /// Rebuild a draft, e.g. for an edit form or for persistence.
    #[must_use]
    pub fn to_draft(&self) -> QuizSettingsDraft {
        QuizSettingsDraft {
            prompt_mode: self.prompt_mode,
            answer_mode: self.answer_mode,
            difficulty: self.difficulty,
            collection: self.collection.clone(),
            order: self.order,
            session_size: self.session_size,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
