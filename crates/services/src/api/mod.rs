use async_trait::async_trait;

use quiz_core::model::{
    AnswerRecord, CollectionId, Difficulty, QuestionDraft, QuestionOrder, QuizSettings, SessionId,
};

use crate::error::FetchError;

mod http;

pub use http::{ApiConfig, HttpQuestionApi};

/// Parameters for one question-batch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    pub difficulty: Difficulty,
    pub limit: u32,
    pub offset: u32,
    pub collection_id: Option<CollectionId>,
    pub order: QuestionOrder,
}

impl QuestionQuery {
    /// Derive the query for a session with the given settings.
    #[must_use]
    pub fn from_settings(settings: &QuizSettings) -> Self {
        Self {
            difficulty: settings.difficulty(),
            limit: settings.session_size(),
            offset: 0,
            collection_id: settings.collection().cloned(),
            order: settings.order(),
        }
    }

    /// Shift the query window, e.g. to page past already-seen questions.
    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// Remote supplier of question batches.
///
/// Implementations do not retry or cache; each call is one request.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch a batch of unvalidated question records.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the request fails or the service rejects it.
    async fn fetch_questions(&self, query: &QuestionQuery) -> Result<Vec<QuestionDraft>, FetchError>;
}

/// Remote receiver for per-answer progress records.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Submit the answer history of one session.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the request fails or the service rejects it.
    async fn submit_answers(
        &self,
        session_id: SessionId,
        records: &[AnswerRecord],
    ) -> Result<(), FetchError>;
}
