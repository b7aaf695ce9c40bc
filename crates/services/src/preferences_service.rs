use std::sync::Arc;

use quiz_core::model::{QuizSettings, QuizSettingsDraft};
use storage::repository::PreferencesRepository;

use crate::error::PreferencesServiceError;

/// Loads and saves the last-used quiz settings.
#[derive(Clone)]
pub struct PreferencesService {
    repo: Arc<dyn PreferencesRepository>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(repo: Arc<dyn PreferencesRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on storage failures.
    pub async fn load(&self) -> Result<QuizSettings, PreferencesServiceError> {
        let settings = self.repo.get_preferences().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` if validation fails or persistence
    /// fails.
    pub async fn save(
        &self,
        draft: QuizSettingsDraft,
    ) -> Result<QuizSettings, PreferencesServiceError> {
        let settings = draft.validate()?;
        self.repo.save_preferences(&settings).await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Difficulty, QuizSettingsError};
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn load_falls_back_to_defaults() {
        let service = PreferencesService::new(Arc::new(InMemoryRepository::new()));
        let settings = service.load().await.unwrap();
        assert_eq!(settings, QuizSettings::default());
    }

    #[tokio::test]
    async fn save_persists_validated_settings() {
        let service = PreferencesService::new(Arc::new(InMemoryRepository::new()));

        let mut draft = QuizSettingsDraft::new();
        draft.difficulty = Difficulty::Hard;
        let saved = service.save(draft).await.unwrap();

        assert_eq!(service.load().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn save_rejects_invalid_draft() {
        let service = PreferencesService::new(Arc::new(InMemoryRepository::new()));

        let mut draft = QuizSettingsDraft::new();
        draft.session_size = 0;
        let err = service.save(draft).await.unwrap_err();
        assert!(matches!(
            err,
            PreferencesServiceError::Settings(QuizSettingsError::InvalidSessionSize)
        ));
    }
}
