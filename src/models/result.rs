//! Race result model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Computed race outcome, one per athlete
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct RaceResult {
    pub id: i64,
    pub athlete_id: i64,
    /// Finish minus start, in milliseconds; negative only for invalid results
    pub total_time_ms: i64,
    pub valid: bool,
    pub overall_rank: Option<i32>,
    pub gender_rank: Option<i32>,
    pub age_group_rank: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl RaceResult {
    /// Elapsed race time
    pub fn total_time(&self) -> Duration {
        Duration::milliseconds(self.total_time_ms)
    }

    /// Whether the ranking engine has assigned ranks to this result
    pub fn is_ranked(&self) -> bool {
        self.overall_rank.is_some()
    }
}

/// A valid result together with the athlete data the ranking partitions need
#[derive(Debug, Clone, FromRow)]
pub struct ValidFinisher {
    pub result_id: i64,
    pub athlete_id: i64,
    pub total_time_ms: i64,
    pub gender: String,
    pub age: i32,
}

/// Ranks computed for one result in a single recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankAssignment {
    pub result_id: i64,
    pub overall_rank: i32,
    pub gender_rank: i32,
    /// None when the athlete's age is outside every configured bracket
    pub age_group_rank: Option<i32>,
}

/// A result joined with athlete details for listings
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResultWithAthlete {
    pub result_id: i64,
    pub athlete_id: i64,
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub total_time_ms: i64,
    pub valid: bool,
    pub overall_rank: Option<i32>,
    pub gender_rank: Option<i32>,
    pub age_group_rank: Option<i32>,
}

/// Aggregate finisher statistics
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
pub struct RaceStatistics {
    pub total_results: i64,
    pub valid_results: i64,
    pub invalid_results: i64,
    /// Mean of valid finish times, None without valid finishers
    pub average_finish_ms: Option<i64>,
    pub fastest_finish_ms: Option<i64>,
}
