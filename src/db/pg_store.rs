//! PostgreSQL implementation of the timing ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{
        Athlete, Checkpoint, PassOutcome, PassRecord, RaceResult, RankAssignment, ValidFinisher,
    },
    timing::ports::{AthleteLookup, CheckpointLookup, PassRecordStore, ResultStore},
};

use super::repositories::{
    AthleteRepository, CheckpointRepository, PassRecordRepository, ResultRepository,
};

/// Timing store backed by the connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AthleteLookup for PgStore {
    async fn find_by_card_token(&self, card_token: &str) -> AppResult<Option<Athlete>> {
        AthleteRepository::find_by_card_token(&self.pool, card_token).await
    }

    async fn find_by_id(&self, athlete_id: i64) -> AppResult<Option<Athlete>> {
        AthleteRepository::find_by_id(&self.pool, athlete_id).await
    }
}

#[async_trait]
impl CheckpointLookup for PgStore {
    async fn find_by_id(&self, checkpoint_id: i64) -> AppResult<Option<Checkpoint>> {
        CheckpointRepository::find_by_id(&self.pool, checkpoint_id).await
    }

    async fn all(&self) -> AppResult<Vec<Checkpoint>> {
        CheckpointRepository::list(&self.pool).await
    }

    async fn total(&self) -> AppResult<i64> {
        CheckpointRepository::count(&self.pool).await
    }
}

#[async_trait]
impl PassRecordStore for PgStore {
    async fn upsert(
        &self,
        athlete_id: i64,
        checkpoint_id: i64,
        pass_time: DateTime<Utc>,
        source: &str,
    ) -> AppResult<PassOutcome> {
        PassRecordRepository::upsert(&self.pool, athlete_id, checkpoint_id, pass_time, source).await
    }

    async fn find_by_athlete(&self, athlete_id: i64) -> AppResult<Vec<PassRecord>> {
        PassRecordRepository::find_by_athlete(&self.pool, athlete_id).await
    }
}

#[async_trait]
impl ResultStore for PgStore {
    async fn upsert_by_athlete(
        &self,
        athlete_id: i64,
        total_time_ms: i64,
        valid: bool,
    ) -> AppResult<RaceResult> {
        ResultRepository::upsert_by_athlete(&self.pool, athlete_id, total_time_ms, valid).await
    }

    async fn find_by_athlete(&self, athlete_id: i64) -> AppResult<Option<RaceResult>> {
        ResultRepository::find_by_athlete(&self.pool, athlete_id).await
    }

    async fn all_valid(&self) -> AppResult<Vec<ValidFinisher>> {
        ResultRepository::all_valid(&self.pool).await
    }

    async fn persist_ranks(&self, batch: &[RankAssignment]) -> AppResult<()> {
        ResultRepository::persist_ranks(&self.pool, batch).await
    }

    async fn top_valid(&self, limit: i64) -> AppResult<Vec<RaceResult>> {
        ResultRepository::top_valid(&self.pool, limit).await
    }
}
