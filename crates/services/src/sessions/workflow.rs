use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use quiz_core::Clock;
use quiz_core::model::{Grade, LifetimeStats, QuestionDraft, QuizSettings, SessionReport};
use storage::repository::StatsRepository;

use super::plan::SessionBuilder;
use super::service::QuizSession;
use crate::api::{ProgressSink, QuestionQuery, QuestionSource};
use crate::error::{FetchError, SessionError};

/// Attempts made against the question service before giving up.
const FETCH_ATTEMPTS: u32 = 3;

/// Base delay between attempts; attempt `n` waits `n` times this.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Result of starting a session, tagged for staleness checks.
#[derive(Debug)]
pub struct StartedSession {
    pub session: QuizSession,
    /// Generation of the start request that produced this session. Stale
    /// when it no longer matches the service's latest generation.
    pub generation: u64,
    /// Malformed records dropped while planning.
    pub discarded: usize,
}

/// Result of completing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub report: SessionReport,
    pub grade: Grade,
    /// Non-blocking failures (progress sync, stats persistence). The report
    /// above is valid regardless.
    pub warnings: Vec<String>,
}

/// Orchestrates session start and best-effort completion side effects.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    progress: Arc<dyn ProgressSink>,
    stats: Arc<dyn StatsRepository>,
    generation: Arc<AtomicU64>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        source: Arc<dyn QuestionSource>,
        progress: Arc<dyn ProgressSink>,
        stats: Arc<dyn StatsRepository>,
    ) -> Self {
        Self {
            clock,
            source,
            progress,
            stats,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether a started session is still the latest one.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Fetch questions and build a new session for the given settings.
    ///
    /// Every call claims a fresh generation; if another start claims a newer
    /// one while this fetch is in flight, the late response is discarded so a
    /// slow request can never overwrite a newer session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Fetch` after retries are exhausted,
    /// `SessionError::Empty` when no usable questions remain after
    /// validation, and `SessionError::Superseded` for a stale response.
    pub async fn start_session(
        &self,
        settings: &QuizSettings,
    ) -> Result<StartedSession, SessionError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let query = QuestionQuery::from_settings(settings);
        let drafts = self.fetch_with_retry(&query).await?;

        if !self.is_current(generation) {
            return Err(SessionError::Superseded);
        }

        let target = usize::try_from(settings.session_size()).unwrap_or(usize::MAX);
        let plan = SessionBuilder::new(settings.order(), target).build(drafts);
        let discarded = plan.discarded;
        let session = QuizSession::new(settings.clone(), plan.questions, self.clock.now())?;

        Ok(StartedSession {
            session,
            generation,
            discarded,
        })
    }

    async fn fetch_with_retry(
        &self,
        query: &QuestionQuery,
    ) -> Result<Vec<QuestionDraft>, FetchError> {
        let mut attempt = 1;
        loop {
            match self.source.fetch_questions(query).await {
                Ok(drafts) => return Ok(drafts),
                Err(err) if attempt < FETCH_ATTEMPTS => {
                    log::warn!("question fetch attempt {attempt} failed, retrying: {err}");
                    tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(FetchError::Exhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
            }
        }
    }

    /// Build the final report and run completion side effects.
    ///
    /// Progress sync and stats persistence are best-effort: either failure
    /// is logged and returned as a warning, never as an error, so the player
    /// always reaches the result screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InProgress` if the session has not finished.
    pub async fn complete_session(
        &self,
        session: &QuizSession,
    ) -> Result<SessionOutcome, SessionError> {
        if !session.is_complete() {
            return Err(SessionError::InProgress);
        }

        let report = session.report()?;
        let grade = report.grade();
        let mut warnings = Vec::new();

        let records = session.answer_records();
        if let Err(err) = self.progress.submit_answers(session.id(), &records).await {
            log::warn!("progress sync failed: {err}");
            warnings.push(format!("progress sync failed: {err}"));
        }

        if let Err(err) = self.record_stats(&report).await {
            log::warn!("stats persistence failed: {err}");
            warnings.push(format!("stats persistence failed: {err}"));
        }

        Ok(SessionOutcome {
            report,
            grade,
            warnings,
        })
    }

    async fn record_stats(&self, report: &SessionReport) -> Result<(), SessionError> {
        let mut stats = self.stats.get_stats().await?.unwrap_or_default();
        stats.record(report);
        self.stats.save_stats(&stats).await?;
        Ok(())
    }

    /// Current lifetime stats, defaults when nothing is persisted yet.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on storage failures.
    pub async fn lifetime_stats(&self) -> Result<LifetimeStats, SessionError> {
        Ok(self.stats.get_stats().await?.unwrap_or_default())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::{AnswerRecord, Difficulty, QuestionOrder, QuizSettingsDraft, SessionId};
    use quiz_core::time::fixed_clock;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU32;
    use storage::repository::InMemoryRepository;

    fn draft(id: &str, answer: &str) -> QuestionDraft {
        QuestionDraft {
            id: id.into(),
            prompt: format!("Pick: {answer}"),
            spoken_prompt: None,
            difficulty: Difficulty::Easy,
            choices: vec![answer.into(), "owl".into(), "bee".into()],
            answer: answer.into(),
            hint: None,
        }
    }

    fn batch() -> Vec<QuestionDraft> {
        vec![draft("q0", "cat"), draft("q1", "dog")]
    }

    /// Fails a scripted number of times, then returns the batch.
    struct ScriptedSource {
        calls: AtomicU32,
        failures: u32,
        batch: Vec<QuestionDraft>,
    }

    impl ScriptedSource {
        fn new(failures: u32, batch: Vec<QuestionDraft>) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
                batch,
            }
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuestionSource for ScriptedSource {
        async fn fetch_questions(
            &self,
            _query: &QuestionQuery,
        ) -> Result<Vec<QuestionDraft>, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                return Err(FetchError::Rejected("scripted failure".into()));
            }
            Ok(self.batch.clone())
        }
    }

    /// Sleeps on the first call so a second start can overtake it.
    struct SlowFirstSource {
        calls: AtomicU32,
        batch: Vec<QuestionDraft>,
    }

    #[async_trait]
    impl QuestionSource for SlowFirstSource {
        async fn fetch_questions(
            &self,
            _query: &QuestionQuery,
        ) -> Result<Vec<QuestionDraft>, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == 1 {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            Ok(self.batch.clone())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        submissions: Mutex<Vec<(SessionId, Vec<AnswerRecord>)>>,
        fail: bool,
    }

    #[async_trait]
    impl ProgressSink for RecordingSink {
        async fn submit_answers(
            &self,
            session_id: SessionId,
            records: &[AnswerRecord],
        ) -> Result<(), FetchError> {
            if self.fail {
                return Err(FetchError::Rejected("scripted sink failure".into()));
            }
            self.submissions
                .lock()
                .unwrap()
                .push((session_id, records.to_vec()));
            Ok(())
        }
    }

    fn flow_with(
        source: Arc<dyn QuestionSource>,
        sink: Arc<dyn ProgressSink>,
    ) -> (QuizFlowService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        let flow = QuizFlowService::new(fixed_clock(), source, sink, Arc::new(repo.clone()));
        (flow, repo)
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_succeeds_after_two_failures() {
        let source = Arc::new(ScriptedSource::new(2, batch()));
        let (flow, _repo) = flow_with(source.clone(), Arc::new(RecordingSink::default()));

        let started = flow
            .start_session(&QuizSettings::default())
            .await
            .expect("third attempt succeeds");

        assert_eq!(source.call_count(), 3);
        assert_eq!(started.session.total_questions(), 2);
        assert!(flow.is_current(started.generation));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_gives_up_after_three_failures() {
        let source = Arc::new(ScriptedSource::new(u32::MAX, batch()));
        let (flow, _repo) = flow_with(source.clone(), Arc::new(RecordingSink::default()));

        let err = flow
            .start_session(&QuizSettings::default())
            .await
            .unwrap_err();

        assert_eq!(source.call_count(), 3);
        assert!(matches!(
            err,
            SessionError::Fetch(FetchError::Exhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_superseded_start_is_discarded() {
        let source = Arc::new(SlowFirstSource {
            calls: AtomicU32::new(0),
            batch: batch(),
        });
        let (flow, _repo) = flow_with(source, Arc::new(RecordingSink::default()));
        let settings = QuizSettings::default();

        let slow = flow.start_session(&settings);
        let fast = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flow.start_session(&settings).await
        };

        let (slow_result, fast_result) = tokio::join!(slow, fast);

        assert!(matches!(slow_result.unwrap_err(), SessionError::Superseded));
        let fast = fast_result.expect("newer start wins");
        assert!(flow.is_current(fast.generation));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_batch_surfaces_as_empty_session() {
        let source = Arc::new(ScriptedSource::new(0, Vec::new()));
        let (flow, _repo) = flow_with(source, Arc::new(RecordingSink::default()));

        let err = flow
            .start_session(&QuizSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn random_order_uses_whole_valid_batch() {
        let mut big_batch: Vec<_> = (0..20).map(|i| draft(&format!("q{i}"), "cat")).collect();
        big_batch[0].answer = String::new();

        let source = Arc::new(ScriptedSource::new(0, big_batch));
        let (flow, _repo) = flow_with(source, Arc::new(RecordingSink::default()));

        let mut settings_draft = QuizSettingsDraft::new();
        settings_draft.order = QuestionOrder::Random;
        let settings = settings_draft.validate().unwrap();

        let started = flow.start_session(&settings).await.unwrap();
        assert_eq!(started.discarded, 1);
        assert_eq!(
            started.session.total_questions(),
            settings.session_size() as usize
        );
    }

    #[tokio::test(start_paused = true)]
    async fn completion_records_stats_and_submits_progress() {
        let source = Arc::new(ScriptedSource::new(0, batch()));
        let sink = Arc::new(RecordingSink::default());
        let (flow, repo) = flow_with(source, sink.clone());

        let mut started = flow.start_session(&QuizSettings::default()).await.unwrap();
        let now = flow.clock.now();
        started.session.submit_answer("cat", now).unwrap();
        started.session.advance(now);
        started.session.submit_answer("fish", now).unwrap();
        started.session.advance(now);

        let outcome = flow.complete_session(&started.session).await.unwrap();
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.report.correct(), 1);
        assert_eq!(outcome.report.accuracy(), 50);
        assert_eq!(outcome.grade, Grade::D);

        let submissions = sink.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].0, started.session.id());
        assert_eq!(submissions[0].1.len(), 2);

        let stats = repo_stats(&repo).await;
        assert_eq!(stats.sessions_completed(), 1);
        assert_eq!(stats.questions_answered(), 2);
        assert_eq!(stats.correct_answers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_sync_failure_is_a_warning_not_an_error() {
        let source = Arc::new(ScriptedSource::new(0, batch()));
        let sink = Arc::new(RecordingSink {
            submissions: Mutex::new(Vec::new()),
            fail: true,
        });
        let (flow, repo) = flow_with(source, sink);

        let mut started = flow.start_session(&QuizSettings::default()).await.unwrap();
        let now = flow.clock.now();
        for _ in 0..2 {
            started.session.submit_answer("cat", now).unwrap();
            started.session.advance(now);
        }

        let outcome = flow.complete_session(&started.session).await.unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("progress sync failed"));

        // Stats are still recorded.
        assert_eq!(repo_stats(&repo).await.sessions_completed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn completing_an_unfinished_session_fails() {
        let source = Arc::new(ScriptedSource::new(0, batch()));
        let (flow, _repo) = flow_with(source, Arc::new(RecordingSink::default()));

        let started = flow.start_session(&QuizSettings::default()).await.unwrap();
        let err = flow.complete_session(&started.session).await.unwrap_err();
        assert!(matches!(err, SessionError::InProgress));
    }

    async fn repo_stats(repo: &InMemoryRepository) -> LifetimeStats {
        use storage::repository::StatsRepository as _;
        repo.get_stats().await.unwrap().unwrap_or_default()
    }
}
