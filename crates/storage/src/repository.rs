use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{LifetimeStats, QuizSettings};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for quiz preferences.
///
/// This mirrors the domain `QuizSettings` so repositories can
/// serialize/deserialize without leaking storage concerns into the domain
/// layer. Enum fields travel as their stable string forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesRecord {
    pub prompt_mode: String,
    pub answer_mode: String,
    pub difficulty: String,
    pub collection_id: Option<String>,
    pub question_order: String,
    pub session_size: u32,
}

impl PreferencesRecord {
    #[must_use]
    pub fn from_settings(settings: &QuizSettings) -> Self {
        Self {
            prompt_mode: settings.prompt_mode().as_str().to_owned(),
            answer_mode: settings.answer_mode().as_str().to_owned(),
            difficulty: settings.difficulty().as_str().to_owned(),
            collection_id: settings.collection().map(|c| c.as_str().to_owned()),
            question_order: settings.order().as_str().to_owned(),
            session_size: settings.session_size(),
        }
    }

    /// Convert the record back into domain `QuizSettings`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any persisted field fails to
    /// parse or validate.
    pub fn into_settings(self) -> Result<QuizSettings, StorageError> {
        let draft = quiz_core::model::QuizSettingsDraft {
            prompt_mode: parse_field(&self.prompt_mode)?,
            answer_mode: parse_field(&self.answer_mode)?,
            difficulty: parse_field(&self.difficulty)?,
            collection: self.collection_id.map(quiz_core::model::CollectionId::new),
            order: parse_field(&self.question_order)?,
            session_size: self.session_size,
        };
        draft
            .validate()
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

fn parse_field<T>(raw: &str) -> Result<T, StorageError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|err: T::Err| StorageError::Serialization(err.to_string()))
}

/// Repository contract for the last-used quiz preferences (singleton row).
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// Fetch the stored preferences, `None` when never saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_preferences(&self) -> Result<Option<QuizSettings>, StorageError>;

    /// Persist or replace the stored preferences.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the preferences cannot be stored.
    async fn save_preferences(&self, settings: &QuizSettings) -> Result<(), StorageError>;
}

/// Repository contract for cumulative play statistics (singleton row).
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Fetch the stored stats, `None` when never saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_stats(&self) -> Result<Option<LifetimeStats>, StorageError>;

    /// Persist or replace the stored stats.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stats cannot be stored.
    async fn save_stats(&self, stats: &LifetimeStats) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    preferences: Arc<Mutex<Option<QuizSettings>>>,
    stats: Arc<Mutex<Option<LifetimeStats>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferencesRepository for InMemoryRepository {
    async fn get_preferences(&self) -> Result<Option<QuizSettings>, StorageError> {
        let guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_preferences(&self, settings: &QuizSettings) -> Result<(), StorageError> {
        let mut guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

#[async_trait]
impl StatsRepository for InMemoryRepository {
    async fn get_stats(&self) -> Result<Option<LifetimeStats>, StorageError> {
        let guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_stats(&self, stats: &LifetimeStats) -> Result<(), StorageError> {
        let mut guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*stats);
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub preferences: Arc<dyn PreferencesRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let preferences: Arc<dyn PreferencesRepository> = Arc::new(repo.clone());
        let stats: Arc<dyn StatsRepository> = Arc::new(repo);
        Self { preferences, stats }
    }
}
