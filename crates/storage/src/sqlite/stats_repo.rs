use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{StatsRepository, StorageError};
use quiz_core::model::LifetimeStats;

use super::SqliteRepository;

fn column_u32(row: &sqlx::sqlite::SqliteRow, name: &str) -> Result<u32, StorageError> {
    let value: i64 = row
        .try_get(name)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    u32::try_from(value).map_err(|err| StorageError::Serialization(err.to_string()))
}

#[async_trait]
impl StatsRepository for SqliteRepository {
    async fn get_stats(&self) -> Result<Option<LifetimeStats>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                sessions_completed,
                questions_answered,
                correct_answers,
                best_accuracy
            FROM lifetime_stats
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let sessions_completed = column_u32(&row, "sessions_completed")?;
        let questions_answered = column_u32(&row, "questions_answered")?;
        let correct_answers = column_u32(&row, "correct_answers")?;
        let best_accuracy = column_u32(&row, "best_accuracy")?;

        LifetimeStats::from_persisted(
            sessions_completed,
            questions_answered,
            correct_answers,
            u8::try_from(best_accuracy)
                .map_err(|err| StorageError::Serialization(err.to_string()))?,
        )
        .map(Some)
        .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_stats(&self, stats: &LifetimeStats) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO lifetime_stats (
                id,
                sessions_completed,
                questions_answered,
                correct_answers,
                best_accuracy
            )
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                sessions_completed = excluded.sessions_completed,
                questions_answered = excluded.questions_answered,
                correct_answers = excluded.correct_answers,
                best_accuracy = excluded.best_accuracy
            ",
        )
        .bind(1_i64)
        .bind(i64::from(stats.sessions_completed()))
        .bind(i64::from(stats.questions_answered()))
        .bind(i64::from(stats.correct_answers()))
        .bind(i64::from(stats.best_accuracy()))
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
