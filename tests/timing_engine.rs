//! Timing engine scenarios against the in-memory store

use std::sync::Arc;

use racetime::{
    AppError,
    config::TimingConfig,
    db::MemoryStore,
    models::{
        Athlete, Checkpoint, EventSource, NewAthlete, NewCheckpoint, PassOutcome, RaceResult,
    },
    timing::{
        Evaluation, IngestReport, TimingEngine, TimingStores,
        brackets::parse_age_brackets,
        ports::{PassRecordStore, ResultStore},
    },
};
use tokio_test::{assert_err, assert_ok};

struct Course {
    start: Checkpoint,
    mid: Checkpoint,
    finish: Checkpoint,
}

struct Race {
    store: Arc<MemoryStore>,
    engine: TimingEngine,
    course: Course,
}

fn checkpoint(name: &str, order_index: i32, is_start: bool, is_finish: bool) -> NewCheckpoint {
    NewCheckpoint {
        name: name.to_string(),
        location: None,
        distance_km: f64::from(order_index - 1) * 21.0975,
        order_index,
        is_start,
        is_finish,
        is_midpoint: !is_start && !is_finish,
    }
}

async fn setup_with(config: TimingConfig) -> Race {
    let store = Arc::new(MemoryStore::new());
    let start = store.register_checkpoint(checkpoint("Start", 1, true, false)).await.unwrap();
    let mid = store.register_checkpoint(checkpoint("Half", 2, false, false)).await.unwrap();
    let finish = store.register_checkpoint(checkpoint("Finish", 3, false, true)).await.unwrap();

    let engine = TimingEngine::new(TimingStores::from_shared(store.clone()), &config, None);

    Race {
        store,
        engine,
        course: Course { start, mid, finish },
    }
}

async fn setup() -> Race {
    setup_with(TimingConfig::default()).await
}

impl Race {
    async fn athlete(&self, token: &str, gender: &str, age: i32) -> Athlete {
        self.store
            .register_athlete(NewAthlete {
                card_token: token.to_string(),
                name: format!("Runner {}", token),
                gender: gender.to_string(),
                age,
                phone: None,
            })
            .await
            .unwrap()
    }

    async fn pass(&self, token: &str, checkpoint: &Checkpoint, at: &str) -> IngestReport {
        self.engine
            .ingest(token, checkpoint.id, at, EventSource::Feed)
            .await
            .unwrap()
    }

    /// Start at 07:30, optional half-way pass, finish after `minutes`
    async fn run(&self, token: &str, minutes: i64, via_mid: bool) {
        let clock = 7 * 60 + 30 + minutes;
        let finish = format!("2026-04-12T{:02}:{:02}:00Z", clock / 60, clock % 60);
        self.pass(token, &self.course.start, "2026-04-12T07:30:00Z").await;
        if via_mid {
            self.pass(token, &self.course.mid, "2026-04-12T08:30:00Z").await;
        }
        self.pass(token, &self.course.finish, &finish).await;
    }

    async fn result(&self, athlete: &Athlete) -> RaceResult {
        ResultStore::find_by_athlete(self.store.as_ref(), athlete.id)
            .await
            .unwrap()
            .expect("result stored")
    }
}

#[tokio::test]
async fn test_full_course_produces_valid_ranked_result() {
    let race = setup().await;
    let a = race.athlete("A", "F", 28).await;

    race.pass("A", &race.course.start, "2026-04-12T07:30:00Z").await;
    race.pass("A", &race.course.mid, "2026-04-12T08:35:00Z").await;
    let report = race.pass("A", &race.course.finish, "2026-04-12T09:40:00Z").await;

    let evaluation = report.evaluation.expect("finish pass evaluates");
    let result = evaluation.result().expect("race complete");
    assert_eq!(result.total_time_ms, 7_800_000);
    assert!(result.valid);

    let stored = race.result(&a).await;
    assert_eq!(stored.overall_rank, Some(1));
    assert_eq!(stored.gender_rank, Some(1));
    assert_eq!(stored.age_group_rank, Some(1));
}

#[tokio::test]
async fn test_skipped_checkpoint_is_invalid_and_unranked() {
    let race = setup().await;
    let b = race.athlete("B", "M", 35).await;

    race.run("B", 130, false).await;

    let result = race.result(&b).await;
    assert_eq!(result.total_time_ms, 7_800_000);
    assert!(!result.valid);
    assert_eq!(result.overall_rank, None);
    assert!(assert_ok!(race.engine.leaderboard(None).await).is_empty());
}

#[tokio::test]
async fn test_equal_times_share_rank_and_next_is_dense() {
    let race = setup().await;
    let c = race.athlete("C", "F", 25).await;
    let d = race.athlete("D", "M", 40).await;
    let e = race.athlete("E", "M", 50).await;

    race.run("C", 120, true).await;
    race.run("D", 120, true).await;
    race.run("E", 125, true).await;

    assert_eq!(race.result(&c).await.overall_rank, Some(1));
    assert_eq!(race.result(&d).await.overall_rank, Some(1));
    assert_eq!(race.result(&e).await.overall_rank, Some(2));

    // D and E share the gender partition
    assert_eq!(race.result(&d).await.gender_rank, Some(1));
    assert_eq!(race.result(&e).await.gender_rank, Some(2));

    let board = assert_ok!(race.engine.leaderboard(None).await);
    let order: Vec<i64> = board.iter().map(|r| r.athlete_id).collect();
    assert_eq!(order, vec![c.id, d.id, e.id]);
}

#[tokio::test]
async fn test_leaderboard_limit() {
    let race = setup().await;
    let fast = race.athlete("F1", "M", 30).await;
    let mid = race.athlete("F2", "M", 30).await;
    race.athlete("F3", "M", 30).await;

    race.run("F3", 120, true).await;
    race.run("F1", 110, true).await;
    race.run("F2", 115, true).await;

    let top = assert_ok!(race.engine.leaderboard(Some(2)).await);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].athlete_id, fast.id);
    assert_eq!(top[1].athlete_id, mid.id);

    let err = assert_err!(race.engine.leaderboard(Some(0)).await);
    assert!(matches!(err, AppError::InvalidArgument(_)));
    let err = assert_err!(race.engine.leaderboard(Some(-3)).await);
    assert!(matches!(err, AppError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_repeated_scan_keeps_first_time() {
    let race = setup().await;
    race.athlete("R", "F", 30).await;

    let first = race.pass("R", &race.course.start, "2026-04-12T07:30:00Z").await;
    assert!(first.pass.is_created());

    let again = race.pass("R", &race.course.start, "2026-04-12T07:30:00Z").await;
    let later = race.pass("R", &race.course.start, "2026-04-12T07:45:00Z").await;

    let expected = first.pass.stored_time();
    assert_eq!(again.pass, PassOutcome::AlreadyRecorded { pass_time: expected });
    assert_eq!(later.pass, PassOutcome::AlreadyRecorded { pass_time: expected });
    assert_eq!(race.store.pass_count().await, 1);
}

#[tokio::test]
async fn test_rejected_events_write_nothing() {
    let race = setup().await;
    race.athlete("V", "F", 30).await;

    let err = assert_err!(
        race.engine
            .ingest("UNKNOWN", race.course.start.id, "2026-04-12T07:30:00Z", EventSource::Feed)
            .await
    );
    assert!(matches!(err, AppError::NotFound(_)));

    let err = assert_err!(
        race.engine
            .ingest("V", 9_999, "2026-04-12T07:30:00Z", EventSource::Feed)
            .await
    );
    assert!(matches!(err, AppError::NotFound(_)));

    let err = assert_err!(
        race.engine
            .ingest("V", race.course.start.id, "half past seven", EventSource::Manual)
            .await
    );
    assert!(matches!(err, AppError::InvalidTimestamp(_)));

    assert_eq!(race.store.pass_count().await, 0);
}

#[tokio::test]
async fn test_finish_without_start_is_incomplete() {
    let race = setup().await;
    let athlete = race.athlete("I", "M", 30).await;

    let report = race.pass("I", &race.course.finish, "2026-04-12T09:40:00Z").await;
    assert_eq!(
        report.evaluation,
        Some(Evaluation::Incomplete {
            has_start: false,
            has_finish: true
        })
    );
    assert!(race.store.all_results().await.is_empty());

    let evaluation = assert_ok!(race.engine.recalculate(athlete.id).await);
    assert!(evaluation.result().is_none());
}

#[tokio::test]
async fn test_recalculate_unknown_athlete() {
    let race = setup().await;
    let err = assert_err!(race.engine.recalculate(404).await);
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_finish_before_start_is_invalid() {
    let race = setup().await;
    let athlete = race.athlete("N", "F", 30).await;

    race.pass("N", &race.course.start, "2026-04-12T09:00:00Z").await;
    race.pass("N", &race.course.mid, "2026-04-12T08:30:00Z").await;
    let report = race.pass("N", &race.course.finish, "2026-04-12T08:00:00Z").await;

    match report.evaluation {
        Some(Evaluation::Completed {
            result,
            negative_duration,
            ..
        }) => {
            assert!(negative_duration);
            assert!(!result.valid);
            assert_eq!(result.total_time_ms, -3_600_000);
        }
        other => panic!("expected a completed evaluation, got {:?}", other),
    }
    assert_eq!(race.result(&athlete).await.overall_rank, None);
}

#[tokio::test]
async fn test_late_midpoint_pass_corrects_result() {
    let race = setup().await;
    let athlete = race.athlete("L", "M", 33).await;

    race.run("L", 130, false).await;
    assert!(!race.result(&athlete).await.valid);

    let report = race
        .engine
        .ingest("L", race.course.mid.id, "2026-04-12T08:30:00Z", EventSource::Manual)
        .await
        .unwrap();
    assert!(report.evaluation.is_some());

    let corrected = race.result(&athlete).await;
    assert!(corrected.valid);
    assert_eq!(corrected.overall_rank, Some(1));
}

#[tokio::test]
async fn test_recalculate_is_idempotent() {
    let race = setup().await;
    let athlete = race.athlete("Q", "F", 30).await;
    race.run("Q", 150, true).await;

    let first = race.result(&athlete).await;
    let evaluation = assert_ok!(race.engine.recalculate(athlete.id).await);
    let again = race.result(&athlete).await;

    assert_eq!(evaluation.result().map(|r| r.id), Some(first.id));
    assert_eq!(again.total_time_ms, first.total_time_ms);
    assert_eq!(again.overall_rank, first.overall_rank);
    assert_eq!(race.store.all_results().await.len(), 1);
}

#[tokio::test]
async fn test_retry_after_persistence_failure_completes() {
    let race = setup().await;
    let athlete = race.athlete("P", "M", 30).await;

    race.pass("P", &race.course.start, "2026-04-12T07:30:00Z").await;
    race.pass("P", &race.course.mid, "2026-04-12T08:30:00Z").await;

    race.store.set_fail_writes(true);
    let err = assert_err!(
        race.engine
            .ingest("P", race.course.finish.id, "2026-04-12T09:30:00Z", EventSource::Feed)
            .await
    );
    assert!(err.is_retryable());

    race.store.set_fail_writes(false);
    let report = race.pass("P", &race.course.finish, "2026-04-12T09:30:00Z").await;
    assert!(report.evaluation.and_then(|e| e.result().cloned()).is_some());
    assert_eq!(race.result(&athlete).await.overall_rank, Some(1));
}

#[tokio::test]
async fn test_retry_after_pass_stored_reevaluates() {
    let race = setup().await;
    let athlete = race.athlete("S", "M", 30).await;

    race.pass("S", &race.course.start, "2026-04-12T07:30:00Z").await;
    race.pass("S", &race.course.mid, "2026-04-12T08:30:00Z").await;

    // The pass lands but the evaluation is never run
    let at = "2026-04-12T09:30:00Z".parse().unwrap();
    assert_ok!(race.store.upsert(athlete.id, race.course.finish.id, at, "feed").await);
    assert!(race.store.all_results().await.is_empty());

    let report = race.pass("S", &race.course.finish, "2026-04-12T09:30:00Z").await;
    assert!(matches!(report.pass, PassOutcome::AlreadyRecorded { .. }));
    assert_eq!(race.result(&athlete).await.total_time_ms, 7_200_000);
}

#[tokio::test]
async fn test_athlete_outside_brackets_keeps_overall_and_gender_rank() {
    let config = TimingConfig {
        age_brackets: parse_age_brackets("18-30,31-45").unwrap(),
        ..TimingConfig::default()
    };
    let race = setup_with(config).await;
    let senior = race.athlete("OLD", "F", 70).await;
    let young = race.athlete("YNG", "F", 25).await;

    race.run("OLD", 140, true).await;
    race.run("YNG", 150, true).await;

    let senior = race.result(&senior).await;
    assert_eq!(senior.overall_rank, Some(1));
    assert_eq!(senior.gender_rank, Some(1));
    assert_eq!(senior.age_group_rank, None);

    let young = race.result(&young).await;
    assert_eq!(young.overall_rank, Some(2));
    assert_eq!(young.age_group_rank, Some(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_finishes_publish_consistent_ranks() {
    let race = Arc::new(setup().await);

    let mut athletes = Vec::new();
    for i in 0..24 {
        let gender = if i % 2 == 0 { "F" } else { "M" };
        athletes.push(race.athlete(&format!("T{}", i), gender, 20 + i).await);
    }

    let mut handles = Vec::new();
    for (i, athlete) in athletes.iter().enumerate() {
        let race = race.clone();
        let token = athlete.card_token.clone();
        // Pairs of athletes share a finish time
        let minutes = 120 + (i as i64 / 2);
        handles.push(tokio::spawn(async move {
            race.run(&token, minutes, true).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let results = race.store.all_results().await;
    assert_eq!(results.len(), athletes.len());
    for result in &results {
        let expected = (result.total_time_ms / 60_000 - 120 + 1) as i32;
        assert_eq!(result.overall_rank, Some(expected), "athlete {}", result.athlete_id);
    }
}

#[tokio::test]
async fn test_repeated_finish_leaves_result_unchanged() {
    let race = setup().await;
    let athlete = race.athlete("U", "F", 30).await;
    race.run("U", 150, true).await;
    let first = race.result(&athlete).await;

    let report = race.pass("U", &race.course.finish, "2026-04-12T10:00:00Z").await;
    match report.evaluation {
        Some(Evaluation::Completed { result, changed, .. }) => {
            assert!(!changed);
            assert_eq!(result.total_time_ms, first.total_time_ms);
        }
        other => panic!("expected a completed evaluation, got {:?}", other),
    }

    let report = race.pass("U", &race.course.mid, "2026-04-12T08:30:00Z").await;
    assert!(report.evaluation.is_none());
    assert_eq!(race.result(&athlete).await.overall_rank, first.overall_rank);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_passes_of_one_athlete_settle_valid() {
    for round in 0..50 {
        let race = Arc::new(setup().await);
        let athlete = race.athlete("C", "M", 30).await;
        race.pass("C", &race.course.start, "2026-04-12T07:30:00Z").await;

        let mid = tokio::spawn({
            let race = race.clone();
            async move { race.pass("C", &race.course.mid, "2026-04-12T08:30:00Z").await }
        });
        let finish = tokio::spawn({
            let race = race.clone();
            async move { race.pass("C", &race.course.finish, "2026-04-12T09:30:00Z").await }
        });
        mid.await.unwrap();
        finish.await.unwrap();

        let results = race.store.all_results().await;
        assert_eq!(results.len(), 1, "round {}", round);
        let result = race.result(&athlete).await;
        assert!(result.valid, "round {}", round);
        assert_eq!(result.overall_rank, Some(1), "round {}", round);
        assert_eq!(race.store.pass_count().await, 3, "round {}", round);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_identical_concurrent_events_record_once() {
    for round in 0..50 {
        let race = Arc::new(setup().await);
        race.athlete("D", "F", 30).await;

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let race = race.clone();
                tokio::spawn(async move {
                    race.pass("D", &race.course.start, "2026-04-12T07:30:00Z").await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().pass.is_created() {
                created += 1;
            }
        }
        assert_eq!(created, 1, "round {}", round);
        assert_eq!(race.store.pass_count().await, 1, "round {}", round);
    }
}
