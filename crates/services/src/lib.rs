#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod error;
pub mod preferences_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use api::{ApiConfig, HttpQuestionApi, ProgressSink, QuestionQuery, QuestionSource};
pub use app_services::AppServices;
pub use error::{AppServicesError, FetchError, PreferencesServiceError, SessionError};
pub use preferences_service::PreferencesService;

pub use sessions::{
    QuizFlowService, QuizSession, SessionBuilder, SessionOutcome, SessionPlan, SessionProgress,
    StartedSession, SubmittedAnswer,
};
