//! Result response DTOs

use serde::Serialize;

use crate::{
    models::{RaceStatistics, ResultWithAthlete},
    utils::time::format_race_time,
};

/// Result row with athlete details
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result_id: i64,
    pub athlete_id: i64,
    pub name: String,
    pub gender: String,
    pub age: i32,
    /// Label of the athlete's age bracket, if any
    pub age_group: Option<String>,
    pub total_time_ms: i64,
    pub total_time: String,
    pub valid: bool,
    pub overall_rank: Option<i32>,
    pub gender_rank: Option<i32>,
    pub age_group_rank: Option<i32>,
}

impl ResultResponse {
    pub fn new(row: ResultWithAthlete, age_group: Option<String>) -> Self {
        Self {
            total_time: format_race_time(row.total_time_ms),
            age_group,
            result_id: row.result_id,
            athlete_id: row.athlete_id,
            name: row.name,
            gender: row.gender,
            age: row.age,
            total_time_ms: row.total_time_ms,
            valid: row.valid,
            overall_rank: row.overall_rank,
            gender_rank: row.gender_rank,
            age_group_rank: row.age_group_rank,
        }
    }
}

/// Result list response
#[derive(Debug, Serialize)]
pub struct ResultsListResponse {
    pub results: Vec<ResultResponse>,
    pub total: usize,
}

/// Outcome of a notification resend
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub athlete_id: i64,
    pub result_id: i64,
    pub total_time: String,
    pub status: &'static str,
}

/// Race statistics response
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    #[serde(flatten)]
    pub stats: RaceStatistics,
    pub average_finish_time: Option<String>,
    pub fastest_finish_time: Option<String>,
    pub checkpoint_count: i64,
}

impl StatisticsResponse {
    pub fn new(stats: RaceStatistics, checkpoint_count: i64) -> Self {
        Self {
            average_finish_time: stats.average_finish_ms.map(format_race_time),
            fastest_finish_time: stats.fastest_finish_ms.map(format_race_time),
            stats,
            checkpoint_count,
        }
    }
}
