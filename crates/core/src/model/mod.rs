mod grade;
mod ids;
mod progress;
mod question;
mod report;
mod settings;
mod stats;

pub use ids::{CollectionId, QuestionId, SessionId};

pub use grade::{Celebration, Grade};
pub use progress::AnswerRecord;
pub use question::{Difficulty, ParseDifficultyError, Question, QuestionDraft, QuestionError};
pub use report::{ReportError, SessionReport};
pub use settings::{
    AnswerMode, ParseModeError, PromptMode, QuestionOrder, QuizSettings, QuizSettingsDraft,
    QuizSettingsError, DEFAULT_SESSION_SIZE,
};
pub use stats::{LifetimeStats, StatsError};
