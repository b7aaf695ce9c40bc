//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuizSettingsError, ReportError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while talking to the question service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("invalid question service base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("question service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("question service rejected the request: {0}")]
    Rejected(String),
    #[error("question service returned an empty response")]
    EmptyResponse,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question service unavailable after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("session is still in progress")]
    InProgress,
    #[error("a newer session start replaced this one")]
    Superseded,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PreferencesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferencesServiceError {
    #[error(transparent)]
    Settings(#[from] QuizSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("question service is not configured (set QUIZ_API_URL)")]
    ApiNotConfigured,
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
