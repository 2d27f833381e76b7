//! Timing read service

use sqlx::PgPool;

use crate::{
    db::repositories::{AthleteRepository, PassRecordRepository},
    error::{AppError, AppResult},
    models::TimelineEntry,
};

/// Read-side timing queries that bypass the engine
pub struct TimingService;

impl TimingService {
    /// Passes of an athlete joined with checkpoint details, ordered by pass time
    pub async fn timeline(pool: &PgPool, athlete_id: i64) -> AppResult<Vec<TimelineEntry>> {
        let (athlete, entries) = futures::try_join!(
            AthleteRepository::find_by_id(pool, athlete_id),
            PassRecordRepository::timeline(pool, athlete_id),
        )?;

        if athlete.is_none() {
            return Err(AppError::NotFound(format!(
                "No athlete found with ID {}",
                athlete_id
            )));
        }

        Ok(entries)
    }
}
