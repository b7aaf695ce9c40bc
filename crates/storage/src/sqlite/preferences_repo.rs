use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{PreferencesRecord, PreferencesRepository, StorageError};
use quiz_core::model::QuizSettings;

use super::SqliteRepository;

#[async_trait]
impl PreferencesRepository for SqliteRepository {
    async fn get_preferences(&self) -> Result<Option<QuizSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                prompt_mode,
                answer_mode,
                difficulty,
                collection_id,
                question_order,
                session_size
            FROM quiz_preferences
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let prompt_mode: String = row
            .try_get("prompt_mode")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let answer_mode: String = row
            .try_get("answer_mode")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let difficulty: String = row
            .try_get("difficulty")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let collection_id: Option<String> = row
            .try_get("collection_id")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let session_size: i64 = row
            .try_get("session_size")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let question_order: String = row
            .try_get("question_order")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        let record = PreferencesRecord {
            prompt_mode,
            answer_mode,
            difficulty,
            collection_id,
            question_order,
            session_size: u32::try_from(session_size)
                .map_err(|err| StorageError::Serialization(err.to_string()))?,
        };

        record.into_settings().map(Some)
    }

    async fn save_preferences(&self, settings: &QuizSettings) -> Result<(), StorageError> {
        let record = PreferencesRecord::from_settings(settings);

        sqlx::query(
            r"
            INSERT INTO quiz_preferences (
                id,
                prompt_mode,
                answer_mode,
                difficulty,
                collection_id,
                question_order,
                session_size
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                prompt_mode = excluded.prompt_mode,
                answer_mode = excluded.answer_mode,
                difficulty = excluded.difficulty,
                collection_id = excluded.collection_id,
                question_order = excluded.question_order,
                session_size = excluded.session_size
            ",
        )
        .bind(1_i64)
        .bind(&record.prompt_mode)
        .bind(&record.answer_mode)
        .bind(&record.difficulty)
        .bind(&record.collection_id)
        .bind(&record.question_order)
        .bind(i64::from(record.session_size))
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
