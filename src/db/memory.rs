//! In-memory implementation of the timing ports
//!
//! Holds the whole race in one `RwLock`. Rank publish replaces every rank field
//! under a single write guard, so readers see either the old or the new rank set.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        Athlete, Checkpoint, NewAthlete, NewCheckpoint, PassOutcome, PassRecord, RaceResult,
        RankAssignment, ValidFinisher,
    },
    timing::ports::{AthleteLookup, CheckpointLookup, PassRecordStore, ResultStore},
};

#[derive(Default)]
struct MemoryState {
    athletes: BTreeMap<i64, Athlete>,
    checkpoints: BTreeMap<i64, Checkpoint>,
    passes: HashMap<(i64, i64), PassRecord>,
    /// Keyed by athlete id
    results: BTreeMap<i64, RaceResult>,
    next_athlete_id: i64,
    next_checkpoint_id: i64,
    next_pass_id: i64,
    next_result_id: i64,
}

/// Timing store kept in process memory
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a persistence error until cleared
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("store rejected the write".to_string()));
        }
        Ok(())
    }

    /// Register an athlete; card tokens are unique
    pub async fn register_athlete(&self, athlete: NewAthlete) -> AppResult<Athlete> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if state
            .athletes
            .values()
            .any(|a| a.card_token == athlete.card_token)
        {
            return Err(AppError::AlreadyExists(format!(
                "Card token {} is already registered",
                athlete.card_token
            )));
        }

        state.next_athlete_id += 1;
        let athlete = Athlete {
            id: state.next_athlete_id,
            card_token: athlete.card_token,
            name: athlete.name,
            gender: athlete.gender,
            age: athlete.age,
            phone: athlete.phone,
            created_at: Utc::now(),
        };
        state.athletes.insert(athlete.id, athlete.clone());

        Ok(athlete)
    }

    /// Add a checkpoint to the course.
    ///
    /// Rejects a second start or finish and a duplicate `order_index`.
    pub async fn register_checkpoint(&self, checkpoint: NewCheckpoint) -> AppResult<Checkpoint> {
        self.check_writable()?;
        if checkpoint.is_start && checkpoint.is_finish {
            return Err(AppError::Validation(
                "A checkpoint cannot be both start and finish".to_string(),
            ));
        }

        let mut state = self.state.write().await;

        for existing in state.checkpoints.values() {
            if existing.order_index == checkpoint.order_index {
                return Err(AppError::AlreadyExists(format!(
                    "Order index {} is already used by checkpoint {}",
                    checkpoint.order_index, existing.id
                )));
            }
            if checkpoint.is_start && existing.is_start {
                return Err(AppError::Conflict("The course already has a start".to_string()));
            }
            if checkpoint.is_finish && existing.is_finish {
                return Err(AppError::Conflict("The course already has a finish".to_string()));
            }
        }

        state.next_checkpoint_id += 1;
        let checkpoint = Checkpoint {
            id: state.next_checkpoint_id,
            name: checkpoint.name,
            location: checkpoint.location,
            distance_km: checkpoint.distance_km,
            order_index: checkpoint.order_index,
            is_start: checkpoint.is_start,
            is_finish: checkpoint.is_finish,
            is_midpoint: checkpoint.is_midpoint,
            created_at: Utc::now(),
        };
        state.checkpoints.insert(checkpoint.id, checkpoint.clone());

        Ok(checkpoint)
    }

    /// Number of stored pass records
    pub async fn pass_count(&self) -> usize {
        self.state.read().await.passes.len()
    }

    /// Every stored result ordered by athlete id
    pub async fn all_results(&self) -> Vec<RaceResult> {
        self.state.read().await.results.values().cloned().collect()
    }
}

#[async_trait]
impl AthleteLookup for MemoryStore {
    async fn find_by_card_token(&self, card_token: &str) -> AppResult<Option<Athlete>> {
        let state = self.state.read().await;
        Ok(state
            .athletes
            .values()
            .find(|a| a.card_token == card_token)
            .cloned())
    }

    async fn find_by_id(&self, athlete_id: i64) -> AppResult<Option<Athlete>> {
        Ok(self.state.read().await.athletes.get(&athlete_id).cloned())
    }
}

#[async_trait]
impl CheckpointLookup for MemoryStore {
    async fn find_by_id(&self, checkpoint_id: i64) -> AppResult<Option<Checkpoint>> {
        Ok(self.state.read().await.checkpoints.get(&checkpoint_id).cloned())
    }

    async fn all(&self) -> AppResult<Vec<Checkpoint>> {
        let state = self.state.read().await;
        let mut checkpoints: Vec<Checkpoint> = state.checkpoints.values().cloned().collect();
        checkpoints.sort_by_key(|c| c.order_index);
        Ok(checkpoints)
    }

    async fn total(&self) -> AppResult<i64> {
        Ok(self.state.read().await.checkpoints.len() as i64)
    }
}

#[async_trait]
impl PassRecordStore for MemoryStore {
    async fn upsert(
        &self,
        athlete_id: i64,
        checkpoint_id: i64,
        pass_time: DateTime<Utc>,
        source: &str,
    ) -> AppResult<PassOutcome> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if let Some(existing) = state.passes.get(&(athlete_id, checkpoint_id)) {
            return Ok(PassOutcome::AlreadyRecorded {
                pass_time: existing.pass_time,
            });
        }

        state.next_pass_id += 1;
        let record = PassRecord {
            id: state.next_pass_id,
            athlete_id,
            checkpoint_id,
            pass_time,
            source: source.to_string(),
            recorded_at: Utc::now(),
        };
        state.passes.insert((athlete_id, checkpoint_id), record);

        Ok(PassOutcome::Created { pass_time })
    }

    async fn find_by_athlete(&self, athlete_id: i64) -> AppResult<Vec<PassRecord>> {
        let state = self.state.read().await;
        let mut passes: Vec<PassRecord> = state
            .passes
            .values()
            .filter(|p| p.athlete_id == athlete_id)
            .cloned()
            .collect();
        passes.sort_by_key(|p| (p.pass_time, p.checkpoint_id));
        Ok(passes)
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn upsert_by_athlete(
        &self,
        athlete_id: i64,
        total_time_ms: i64,
        valid: bool,
    ) -> AppResult<RaceResult> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        let now = Utc::now();

        if let Some(existing) = state.results.get_mut(&athlete_id) {
            existing.total_time_ms = total_time_ms;
            existing.valid = valid;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        state.next_result_id += 1;
        let result = RaceResult {
            id: state.next_result_id,
            athlete_id,
            total_time_ms,
            valid,
            overall_rank: None,
            gender_rank: None,
            age_group_rank: None,
            updated_at: now,
        };
        state.results.insert(athlete_id, result.clone());

        Ok(result)
    }

    async fn find_by_athlete(&self, athlete_id: i64) -> AppResult<Option<RaceResult>> {
        Ok(self.state.read().await.results.get(&athlete_id).cloned())
    }

    async fn all_valid(&self) -> AppResult<Vec<ValidFinisher>> {
        let state = self.state.read().await;
        let finishers = state
            .results
            .values()
            .filter(|r| r.valid)
            .filter_map(|r| {
                state.athletes.get(&r.athlete_id).map(|a| ValidFinisher {
                    result_id: r.id,
                    athlete_id: r.athlete_id,
                    total_time_ms: r.total_time_ms,
                    gender: a.gender.clone(),
                    age: a.age,
                })
            })
            .collect();
        Ok(finishers)
    }

    async fn persist_ranks(&self, batch: &[RankAssignment]) -> AppResult<()> {
        self.check_writable()?;
        let by_result: HashMap<i64, &RankAssignment> =
            batch.iter().map(|a| (a.result_id, a)).collect();

        let mut state = self.state.write().await;
        for result in state.results.values_mut() {
            match by_result.get(&result.id) {
                Some(assignment) => {
                    result.overall_rank = Some(assignment.overall_rank);
                    result.gender_rank = Some(assignment.gender_rank);
                    result.age_group_rank = assignment.age_group_rank;
                }
                None => {
                    result.overall_rank = None;
                    result.gender_rank = None;
                    result.age_group_rank = None;
                }
            }
        }

        Ok(())
    }

    async fn top_valid(&self, limit: i64) -> AppResult<Vec<RaceResult>> {
        let state = self.state.read().await;
        let mut valid: Vec<RaceResult> =
            state.results.values().filter(|r| r.valid).cloned().collect();
        valid.sort_by_key(|r| (r.total_time_ms, r.athlete_id));
        valid.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(valid)
    }
}
