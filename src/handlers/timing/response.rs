//! Timing response DTOs

use serde::Serialize;

use crate::{
    models::{RaceResult, TimelineEntry},
    utils::time::format_race_time,
};

/// One leaderboard row
#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub result_id: i64,
    pub athlete_id: i64,
    pub total_time_ms: i64,
    /// `HH:MM:SS`
    pub total_time: String,
    pub overall_rank: Option<i32>,
    pub gender_rank: Option<i32>,
    pub age_group_rank: Option<i32>,
}

impl From<RaceResult> for LeaderboardEntry {
    fn from(result: RaceResult) -> Self {
        Self {
            total_time: format_race_time(result.total_time_ms),
            result_id: result.id,
            athlete_id: result.athlete_id,
            total_time_ms: result.total_time_ms,
            overall_rank: result.overall_rank,
            gender_rank: result.gender_rank,
            age_group_rank: result.age_group_rank,
        }
    }
}

/// Leaderboard response
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub count: usize,
}

/// Athlete timeline response
#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub athlete_id: i64,
    pub passes: Vec<TimelineEntry>,
}
