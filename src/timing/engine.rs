//! Timing engine - Orchestrates ingestion, evaluation, ranking and notification

use std::sync::Arc;

use serde::Serialize;

use crate::{
    config::TimingConfig,
    error::{AppError, AppResult},
    models::{Athlete, EventSource, PassOutcome, RaceResult},
    utils::time::parse_timestamp,
};

use super::{
    evaluator::{Evaluation, evaluate_athlete},
    locks::AthleteLocks,
    notify::{Notifier, NotifyError},
    ports::TimingStores,
    ranking::{RankingEngine, RecomputeOutcome},
};

/// What an accepted pass event did
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub athlete_id: i64,
    pub checkpoint_id: i64,
    pub pass: PassOutcome,
    /// Present when the event triggered a completion evaluation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

/// Race-timing and ranking engine
#[derive(Clone)]
pub struct TimingEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    stores: TimingStores,
    ranking: RankingEngine,
    locks: AthleteLocks,
    notifier: Option<Arc<dyn Notifier>>,
    leaderboard_default_limit: i64,
}

impl TimingEngine {
    /// Create a new timing engine over the given stores.
    ///
    /// Finish notifications are dispatched only when a notifier is given.
    pub fn new(
        stores: TimingStores,
        config: &TimingConfig,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let ranking = RankingEngine::new(stores.results.clone(), config.age_brackets.clone());

        Self {
            inner: Arc::new(EngineInner {
                stores,
                ranking,
                locks: AthleteLocks::new(),
                notifier,
                leaderboard_default_limit: config.leaderboard_default_limit,
            }),
        }
    }

    /// Record one checkpoint pass.
    ///
    /// Validation (athlete, checkpoint, timestamp) completes before any write. A
    /// repeated scan of the same checkpoint keeps the first stored time and does
    /// nothing else, except at the finish where it re-runs the evaluator so a retry
    /// after a failed write completes. A new pass of an athlete who already holds a
    /// result also runs the evaluator. Ranks are republished and the athlete
    /// notified only when the stored result changed.
    pub async fn ingest(
        &self,
        card_token: &str,
        checkpoint_id: i64,
        timestamp: &str,
        source: EventSource,
    ) -> AppResult<IngestReport> {
        let stores = &self.inner.stores;

        let athlete = stores
            .athletes
            .find_by_card_token(card_token)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No athlete found with card token {}", card_token))
            })?;

        let checkpoint = stores
            .checkpoints
            .find_by_id(checkpoint_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No checkpoint found with ID {}", checkpoint_id))
            })?;

        let pass_time = parse_timestamp(timestamp).ok_or_else(|| {
            AppError::InvalidTimestamp(format!("'{}' is not an ISO-8601 date-time", timestamp))
        })?;

        let guard = self.inner.locks.acquire(athlete.id).await;

        let pass = stores
            .passes
            .upsert(athlete.id, checkpoint.id, pass_time, source.as_str())
            .await?;

        match &pass {
            PassOutcome::Created { .. } => tracing::info!(
                athlete_id = athlete.id,
                checkpoint_id = checkpoint.id,
                checkpoint = %checkpoint.name,
                %source,
                %pass_time,
                "Pass recorded"
            ),
            PassOutcome::AlreadyRecorded { pass_time: stored } if *stored != pass_time => {
                tracing::warn!(
                    athlete_id = athlete.id,
                    checkpoint_id = checkpoint.id,
                    stored = %stored,
                    received = %pass_time,
                    %source,
                    "Checkpoint already recorded with a different time, keeping the stored pass"
                )
            }
            PassOutcome::AlreadyRecorded { .. } => tracing::debug!(
                athlete_id = athlete.id,
                checkpoint_id = checkpoint.id,
                "Duplicate scan ignored"
            ),
        }

        let should_evaluate = if checkpoint.is_finish {
            true
        } else if pass.is_created() {
            stores.results.find_by_athlete(athlete.id).await?.is_some()
        } else {
            false
        };

        let evaluation = if should_evaluate {
            Some(self.evaluate(athlete.id).await?)
        } else {
            None
        };

        drop(guard);

        if let Some(evaluation) = &evaluation {
            if evaluation.needs_publish() {
                self.publish(&athlete, true).await?;
            }
        }

        Ok(IngestReport {
            athlete_id: athlete.id,
            checkpoint_id: checkpoint.id,
            pass,
            evaluation,
        })
    }

    /// Re-run completion evaluation for an athlete and republish ranks
    pub async fn recalculate(&self, athlete_id: i64) -> AppResult<Evaluation> {
        let athlete = self
            .inner
            .stores
            .athletes
            .find_by_id(athlete_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No athlete found with ID {}", athlete_id)))?;

        let evaluation = {
            let _guard = self.inner.locks.acquire(athlete.id).await;
            self.evaluate(athlete.id).await?
        };

        if let Evaluation::Completed { .. } = evaluation {
            self.publish(&athlete, evaluation.needs_publish()).await?;
        }

        Ok(evaluation)
    }

    /// Send the finish notification for an athlete's current result again.
    ///
    /// Delivery is awaited so the caller learns whether it went out.
    pub async fn notify_result(&self, athlete_id: i64) -> AppResult<RaceResult> {
        let stores = &self.inner.stores;

        let athlete = stores
            .athletes
            .find_by_id(athlete_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No athlete found with ID {}", athlete_id)))?;

        let result = stores.results.find_by_athlete(athlete.id).await?.ok_or_else(|| {
            AppError::NotFound(format!("No result recorded for athlete {}", athlete.id))
        })?;

        if !result.valid {
            return Err(AppError::InvalidArgument(format!(
                "Result of athlete {} is invalid and is not announced",
                athlete.id
            )));
        }

        let notifier = self.inner.notifier.as_ref().ok_or_else(|| {
            AppError::Conflict("Finish notifications are disabled".to_string())
        })?;

        notifier.notify(&athlete, &result).await.map_err(|e| match e {
            NotifyError::MissingRecipient(_) => AppError::InvalidArgument(e.to_string()),
            NotifyError::Delivery(_) => AppError::Internal(anyhow::anyhow!(e)),
        })?;

        tracing::info!(
            athlete_id = athlete.id,
            result_id = result.id,
            "Finish notification resent"
        );

        Ok(result)
    }

    /// The `limit` fastest valid results, configured default when `None`
    pub async fn leaderboard(&self, limit: Option<i64>) -> AppResult<Vec<RaceResult>> {
        let limit = limit.unwrap_or(self.inner.leaderboard_default_limit);
        if limit <= 0 {
            return Err(AppError::InvalidArgument(format!(
                "limit must be a positive integer, got {}",
                limit
            )));
        }

        self.inner.stores.results.top_valid(limit).await
    }

    async fn evaluate(&self, athlete_id: i64) -> AppResult<Evaluation> {
        let stores = &self.inner.stores;
        evaluate_athlete(
            stores.checkpoints.as_ref(),
            stores.passes.as_ref(),
            stores.results.as_ref(),
            athlete_id,
        )
        .await
    }

    /// Recompute ranks after a result write, then optionally notify on a valid result
    async fn publish(&self, athlete: &Athlete, notify: bool) -> AppResult<RecomputeOutcome> {
        let outcome = self.inner.ranking.recompute().await?;

        let Some(notifier) = self.inner.notifier.clone().filter(|_| notify) else {
            return Ok(outcome);
        };

        if let Some(result) = self.inner.stores.results.find_by_athlete(athlete.id).await? {
            if result.valid {
                dispatch_notification(notifier, athlete.clone(), result);
            }
        }

        Ok(outcome)
    }
}

/// Fire-and-forget delivery on the runtime
fn dispatch_notification(notifier: Arc<dyn Notifier>, athlete: Athlete, result: RaceResult) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&athlete, &result).await {
            tracing::warn!(
                athlete_id = athlete.id,
                result_id = result.id,
                error = %e,
                "Finish notification failed"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::{
        db::MemoryStore,
        models::{NewAthlete, NewCheckpoint},
        timing::notify::{MockNotifier, NotifyError},
    };

    /// Counts deliveries without sending anything
    #[derive(Default)]
    struct CountingNotifier {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _: &Athlete, _: &RaceResult) -> Result<(), NotifyError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn course(store: &MemoryStore) -> (i64, i64) {
        let mut ids = Vec::new();
        for (order_index, is_start, is_finish) in [(1, true, false), (2, false, true)] {
            let checkpoint = store
                .register_checkpoint(NewCheckpoint {
                    name: format!("CP{}", order_index),
                    location: None,
                    distance_km: 0.0,
                    order_index,
                    is_start,
                    is_finish,
                    is_midpoint: false,
                })
                .await
                .unwrap();
            ids.push(checkpoint.id);
        }
        (ids[0], ids[1])
    }

    async fn athlete(store: &MemoryStore, token: &str) -> Athlete {
        store
            .register_athlete(NewAthlete {
                card_token: token.to_string(),
                name: "Ana".to_string(),
                gender: "F".to_string(),
                age: 29,
                phone: Some("13800138000".to_string()),
            })
            .await
            .unwrap()
    }

    fn engine(store: &Arc<MemoryStore>, notifier: Option<Arc<dyn Notifier>>) -> TimingEngine {
        TimingEngine::new(
            TimingStores::from_shared(store.clone()),
            &TimingConfig::default(),
            notifier,
        )
    }

    async fn finish_race(engine: &TimingEngine, start: i64, finish: i64) -> IngestReport {
        engine
            .ingest("ANA", start, "2026-04-12T07:30:00Z", EventSource::Feed)
            .await
            .unwrap();
        engine
            .ingest("ANA", finish, "2026-04-12T10:00:00Z", EventSource::Feed)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_finish_notifies_with_ranks() {
        let store = Arc::new(MemoryStore::new());
        let (start, finish) = course(&store).await;
        let ana = athlete(&store, "ANA").await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(1).returning(move |athlete, result| {
            tx.send((athlete.id, result.overall_rank)).ok();
            Ok(())
        });

        let engine = engine(&store, Some(Arc::new(notifier)));
        finish_race(&engine, start, finish).await;

        let sent = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("notification dispatched");
        assert_eq!(sent, Some((ana.id, Some(1))));
    }

    #[tokio::test]
    async fn test_repeated_scans_do_not_notify_again() {
        let store = Arc::new(MemoryStore::new());
        let (start, finish) = course(&store).await;
        athlete(&store, "ANA").await;

        let counter = Arc::new(CountingNotifier::default());
        let engine = engine(&store, Some(counter.clone()));
        finish_race(&engine, start, finish).await;

        for _ in 0..3 {
            let report = engine
                .ingest("ANA", finish, "2026-04-12T10:00:00Z", EventSource::Feed)
                .await
                .unwrap();
            assert!(!report.pass.is_created());
            assert!(!report.evaluation.as_ref().is_some_and(Evaluation::needs_publish));
        }

        let report = engine
            .ingest("ANA", start, "2026-04-12T07:30:00Z", EventSource::Feed)
            .await
            .unwrap();
        assert!(!report.pass.is_created());
        assert!(report.evaluation.is_none());

        // Spawned deliveries get a chance to run
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_ingest() {
        let store = Arc::new(MemoryStore::new());
        let (start, finish) = course(&store).await;
        athlete(&store, "ANA").await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .returning(|_, _| Err(NotifyError::Delivery("gateway down".to_string())));

        let engine = engine(&store, Some(Arc::new(notifier)));
        let report = finish_race(&engine, start, finish).await;

        assert!(report.evaluation.and_then(|e| e.result().cloned()).is_some());
    }

    #[tokio::test]
    async fn test_invalid_finish_is_not_notified() {
        let store = Arc::new(MemoryStore::new());
        let (start, finish) = course(&store).await;
        athlete(&store, "ANA").await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(move |athlete, _| {
            tx.send(athlete.id).ok();
            Ok(())
        });

        let engine = engine(&store, Some(Arc::new(notifier)));
        engine
            .ingest("ANA", start, "2026-04-12T10:00:00Z", EventSource::Feed)
            .await
            .unwrap();
        engine
            .ingest("ANA", finish, "2026-04-12T07:30:00Z", EventSource::Feed)
            .await
            .unwrap();

        let sent = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(sent.is_err());
    }

    #[tokio::test]
    async fn test_notify_result_resends_on_demand() {
        let store = Arc::new(MemoryStore::new());
        let (start, finish) = course(&store).await;
        let ana = athlete(&store, "ANA").await;

        let counter = Arc::new(CountingNotifier::default());
        let engine = engine(&store, Some(counter.clone()));
        finish_race(&engine, start, finish).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let result = assert_ok!(engine.notify_result(ana.id).await);
        assert_eq!(result.overall_rank, Some(1));
        assert_eq!(counter.sent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_notify_result_requires_valid_result() {
        let store = Arc::new(MemoryStore::new());
        let (start, finish) = course(&store).await;
        let ana = athlete(&store, "ANA").await;

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        let engine = engine(&store, Some(Arc::new(notifier)));

        let err = assert_err!(engine.notify_result(ana.id).await);
        assert!(matches!(err, AppError::NotFound(_)));
        let err = assert_err!(engine.notify_result(999).await);
        assert!(matches!(err, AppError::NotFound(_)));

        // Finish before start leaves an invalid result
        engine
            .ingest("ANA", start, "2026-04-12T10:00:00Z", EventSource::Feed)
            .await
            .unwrap();
        engine
            .ingest("ANA", finish, "2026-04-12T07:30:00Z", EventSource::Feed)
            .await
            .unwrap();

        let err = assert_err!(engine.notify_result(ana.id).await);
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_notify_result_reports_missing_phone() {
        let store = Arc::new(MemoryStore::new());
        let (start, finish) = course(&store).await;
        let ana = athlete(&store, "ANA").await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .returning(|athlete, _| Err(NotifyError::MissingRecipient(athlete.id)));

        let engine = engine(&store, Some(Arc::new(notifier)));
        finish_race(&engine, start, finish).await;

        let err = assert_err!(engine.notify_result(ana.id).await);
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_notify_result_without_notifier() {
        let store = Arc::new(MemoryStore::new());
        let (start, finish) = course(&store).await;
        let ana = athlete(&store, "ANA").await;

        let engine = engine(&store, None);
        finish_race(&engine, start, finish).await;

        let err = assert_err!(engine.notify_result(ana.id).await);
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
