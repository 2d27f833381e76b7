//! Checkpoint repository

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Checkpoint, NewCheckpoint},
};

/// Repository for checkpoint database operations
pub struct CheckpointRepository;

impl CheckpointRepository {
    /// Create a new checkpoint
    pub async fn create(pool: &PgPool, checkpoint: &NewCheckpoint) -> AppResult<Checkpoint> {
        let checkpoint = sqlx::query_as::<_, Checkpoint>(
            r#"
            INSERT INTO checkpoints (
                name, location, distance_km, order_index, is_start, is_finish, is_midpoint
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&checkpoint.name)
        .bind(&checkpoint.location)
        .bind(checkpoint.distance_km)
        .bind(checkpoint.order_index)
        .bind(checkpoint.is_start)
        .bind(checkpoint.is_finish)
        .bind(checkpoint.is_midpoint)
        .fetch_one(pool)
        .await?;

        Ok(checkpoint)
    }

    /// Find checkpoint by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Checkpoint>> {
        let checkpoint =
            sqlx::query_as::<_, Checkpoint>(r#"SELECT * FROM checkpoints WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(checkpoint)
    }

    /// All checkpoints in course order
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Checkpoint>> {
        let checkpoints =
            sqlx::query_as::<_, Checkpoint>(r#"SELECT * FROM checkpoints ORDER BY order_index"#)
                .fetch_all(pool)
                .await?;

        Ok(checkpoints)
    }

    /// The start checkpoint, if configured
    pub async fn find_start(pool: &PgPool) -> AppResult<Option<Checkpoint>> {
        let checkpoint =
            sqlx::query_as::<_, Checkpoint>(r#"SELECT * FROM checkpoints WHERE is_start"#)
                .fetch_optional(pool)
                .await?;

        Ok(checkpoint)
    }

    /// The finish checkpoint, if configured
    pub async fn find_finish(pool: &PgPool) -> AppResult<Option<Checkpoint>> {
        let checkpoint =
            sqlx::query_as::<_, Checkpoint>(r#"SELECT * FROM checkpoints WHERE is_finish"#)
                .fetch_optional(pool)
                .await?;

        Ok(checkpoint)
    }

    /// Midpoint checkpoints in course order
    pub async fn list_midpoints(pool: &PgPool) -> AppResult<Vec<Checkpoint>> {
        let checkpoints = sqlx::query_as::<_, Checkpoint>(
            r#"SELECT * FROM checkpoints WHERE is_midpoint ORDER BY order_index"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(checkpoints)
    }

    /// Number of checkpoints on the course
    pub async fn count(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM checkpoints"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
