use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use quiz_core::model::{AnswerRecord, CollectionId, QuestionDraft, SessionId};

use crate::error::FetchError;

use super::{ProgressSink, QuestionQuery, QuestionSource};

/// Hard ceiling for a single request against the question service.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("QUIZ_API_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_key = env::var("QUIZ_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        Some(Self { base_url, api_key })
    }
}

/// HTTP client for the question and progress endpoints.
#[derive(Clone, Debug)]
pub struct HttpQuestionApi {
    client: Client,
    config: ApiConfig,
}

impl HttpQuestionApi {
    /// Build a client with the fixed request timeout applied.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidBaseUrl` for an unparseable base URL, or
    /// `FetchError::Http` if the underlying client cannot be constructed.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        if Url::parse(&config.base_url).is_err() {
            return Err(FetchError::InvalidBaseUrl(config.base_url));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn post_json<B, T>(&self, path: &str, payload: &B) -> Result<Envelope<T>, FetchError>
    where
        B: Serialize,
        T: for<'de> Deserialize<'de>,
    {
        let mut request = self.client.post(self.endpoint(path)).json(payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionApi {
    async fn fetch_questions(
        &self,
        query: &QuestionQuery,
    ) -> Result<Vec<QuestionDraft>, FetchError> {
        let payload = QuestionBatchRequest {
            difficulty: query.difficulty.as_str(),
            limit: query.limit,
            offset: query.offset,
            collection_id: query.collection_id.as_ref().map(CollectionId::as_str),
            selection_strategy: query.order.as_str(),
        };
        let envelope: Envelope<Vec<QuestionDraft>> =
            self.post_json("questions/batch", &payload).await?;
        envelope.into_result()
    }
}

#[async_trait]
impl ProgressSink for HttpQuestionApi {
    async fn submit_answers(
        &self,
        session_id: SessionId,
        records: &[AnswerRecord],
    ) -> Result<(), FetchError> {
        let payload = ProgressRequest {
            session_id,
            answers: records,
        };
        // The progress endpoint carries no payload of interest on success.
        let envelope: Envelope<serde_json::Value> =
            self.post_json("progress/answers", &payload).await?;
        envelope.ack()
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct QuestionBatchRequest<'a> {
    difficulty: &'a str,
    limit: u32,
    offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    collection_id: Option<&'a str>,
    selection_strategy: &'a str,
}

#[derive(Debug, Serialize)]
struct ProgressRequest<'a> {
    session_id: SessionId,
    answers: &'a [AnswerRecord],
}

/// Tagged response envelope shared by every endpoint.
///
/// Decoded into a `Result` exactly once, here at the edge; nothing downstream
/// sees the raw `success` flag.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T, FetchError> {
        self.ack()?;
        self.data.ok_or(FetchError::EmptyResponse)
    }

    /// Check the success flag alone, for endpoints that return no data.
    fn ack(&self) -> Result<(), FetchError> {
        if !self.success {
            return Err(FetchError::Rejected(
                self.error.clone().unwrap_or_else(|| "unknown error".into()),
            ));
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
