//! Pass record repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{PassOutcome, PassRecord, TimelineEntry},
};

/// Repository for pass record database operations
pub struct PassRecordRepository;

impl PassRecordRepository {
    /// Insert a pass unless the (athlete, checkpoint) pair already has one
    pub async fn upsert(
        pool: &PgPool,
        athlete_id: i64,
        checkpoint_id: i64,
        pass_time: DateTime<Utc>,
        source: &str,
    ) -> AppResult<PassOutcome> {
        let inserted: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            INSERT INTO pass_records (athlete_id, checkpoint_id, pass_time, source)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (athlete_id, checkpoint_id) DO NOTHING
            RETURNING pass_time
            "#,
        )
        .bind(athlete_id)
        .bind(checkpoint_id)
        .bind(pass_time)
        .bind(source)
        .fetch_optional(pool)
        .await?;

        if let Some(pass_time) = inserted {
            return Ok(PassOutcome::Created { pass_time });
        }

        let stored: DateTime<Utc> = sqlx::query_scalar(
            r#"
            SELECT pass_time FROM pass_records
            WHERE athlete_id = $1 AND checkpoint_id = $2
            "#,
        )
        .bind(athlete_id)
        .bind(checkpoint_id)
        .fetch_one(pool)
        .await?;

        Ok(PassOutcome::AlreadyRecorded { pass_time: stored })
    }

    /// All passes of an athlete ordered by pass time
    pub async fn find_by_athlete(pool: &PgPool, athlete_id: i64) -> AppResult<Vec<PassRecord>> {
        let passes = sqlx::query_as::<_, PassRecord>(
            r#"
            SELECT * FROM pass_records
            WHERE athlete_id = $1
            ORDER BY pass_time, checkpoint_id
            "#,
        )
        .bind(athlete_id)
        .fetch_all(pool)
        .await?;

        Ok(passes)
    }

    /// An athlete's passes joined with checkpoint details
    pub async fn timeline(pool: &PgPool, athlete_id: i64) -> AppResult<Vec<TimelineEntry>> {
        let entries = sqlx::query_as::<_, TimelineEntry>(
            r#"
            SELECT
                p.checkpoint_id,
                c.name AS checkpoint_name,
                c.order_index,
                c.distance_km,
                p.pass_time,
                p.source
            FROM pass_records p
            JOIN checkpoints c ON c.id = p.checkpoint_id
            WHERE p.athlete_id = $1
            ORDER BY p.pass_time, c.order_index
            "#,
        )
        .bind(athlete_id)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }
}
