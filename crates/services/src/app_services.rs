use std::sync::Arc;

use quiz_core::Clock;
use storage::repository::Storage;

use crate::api::{ApiConfig, HttpQuestionApi, ProgressSink, QuestionSource};
use crate::error::AppServicesError;
use crate::preferences_service::PreferencesService;
use crate::sessions::QuizFlowService;

/// Bundles the service layer for a host application.
#[derive(Clone)]
pub struct AppServices {
    pub flow: QuizFlowService,
    pub preferences: PreferencesService,
}

impl AppServices {
    /// Wire services from explicit parts; useful for hosts and tests.
    #[must_use]
    pub fn new(
        clock: Clock,
        storage: &Storage,
        source: Arc<dyn QuestionSource>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            flow: QuizFlowService::new(clock, source, progress, Arc::clone(&storage.stats)),
            preferences: PreferencesService::new(Arc::clone(&storage.preferences)),
        }
    }

    /// Bootstrap against a SQLite database and the environment-configured
    /// question service.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` when the database cannot be opened, the
    /// question service is unconfigured, or the HTTP client cannot be built.
    pub async fn from_env(database_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(database_url).await?;
        let config = ApiConfig::from_env().ok_or(AppServicesError::ApiNotConfigured)?;
        let api = Arc::new(HttpQuestionApi::new(config)?);

        Ok(Self::new(
            Clock::default(),
            &storage,
            Arc::clone(&api) as Arc<dyn QuestionSource>,
            api as Arc<dyn ProgressSink>,
        ))
    }
}
