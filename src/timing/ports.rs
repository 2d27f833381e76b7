//! Storage ports consumed by the timing engine
//!
//! Implementations must be `Send + Sync` for use behind `Arc<dyn _>`. Both the
//! Postgres store and the in-memory store implement every port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{
        Athlete, Checkpoint, PassOutcome, PassRecord, RaceResult, RankAssignment, ValidFinisher,
    },
};

/// Read access to registered athletes
#[async_trait]
pub trait AthleteLookup: Send + Sync {
    async fn find_by_card_token(&self, card_token: &str) -> AppResult<Option<Athlete>>;

    async fn find_by_id(&self, athlete_id: i64) -> AppResult<Option<Athlete>>;
}

/// Read access to the course checkpoint directory
#[async_trait]
pub trait CheckpointLookup: Send + Sync {
    async fn find_by_id(&self, checkpoint_id: i64) -> AppResult<Option<Checkpoint>>;

    /// All checkpoints ordered by `order_index`
    async fn all(&self) -> AppResult<Vec<Checkpoint>>;

    async fn total(&self) -> AppResult<i64>;
}

/// Durable per-(athlete, checkpoint) pass times
#[async_trait]
pub trait PassRecordStore: Send + Sync {
    /// Store a pass unless the pair is already recorded.
    ///
    /// Never creates a second record for the same (athlete, checkpoint) pair and
    /// never overwrites a stored pass time.
    async fn upsert(
        &self,
        athlete_id: i64,
        checkpoint_id: i64,
        pass_time: DateTime<Utc>,
        source: &str,
    ) -> AppResult<PassOutcome>;

    /// All passes of an athlete ordered by pass time
    async fn find_by_athlete(&self, athlete_id: i64) -> AppResult<Vec<PassRecord>>;
}

/// Race results, at most one per athlete
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Create or replace the athlete's result; existing ranks are left for the
    /// next rank publish
    async fn upsert_by_athlete(
        &self,
        athlete_id: i64,
        total_time_ms: i64,
        valid: bool,
    ) -> AppResult<RaceResult>;

    async fn find_by_athlete(&self, athlete_id: i64) -> AppResult<Option<RaceResult>>;

    /// Every valid result joined with the athlete's gender and age
    async fn all_valid(&self) -> AppResult<Vec<ValidFinisher>>;

    /// Atomically replace the rank set.
    ///
    /// Results listed in `batch` take the given ranks; every other result has its
    /// ranks cleared. Readers observe either the previous or the new rank set.
    async fn persist_ranks(&self, batch: &[RankAssignment]) -> AppResult<()>;

    /// The `limit` fastest valid results ordered by `(total_time_ms, athlete_id)`
    async fn top_valid(&self, limit: i64) -> AppResult<Vec<RaceResult>>;
}

/// The set of ports the engine runs against
#[derive(Clone)]
pub struct TimingStores {
    pub athletes: Arc<dyn AthleteLookup>,
    pub checkpoints: Arc<dyn CheckpointLookup>,
    pub passes: Arc<dyn PassRecordStore>,
    pub results: Arc<dyn ResultStore>,
}

impl TimingStores {
    /// Use one store that implements every port
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: AthleteLookup + CheckpointLookup + PassRecordStore + ResultStore + 'static,
    {
        Self {
            athletes: store.clone(),
            checkpoints: store.clone(),
            passes: store.clone(),
            results: store,
        }
    }
}
