//! Checkpoint service

use sqlx::PgPool;

use crate::{
    db::repositories::CheckpointRepository,
    error::{AppError, AppResult},
    handlers::checkpoints::request::CreateCheckpointRequest,
    models::{Checkpoint, NewCheckpoint},
    utils::validation::{sanitize_string, validate_checkpoint_flags},
};

/// Checkpoint service for business logic
pub struct CheckpointService;

impl CheckpointService {
    /// Add a checkpoint to the course.
    ///
    /// The database enforces a unique `order_index` and a single start and finish.
    pub async fn create(pool: &PgPool, payload: CreateCheckpointRequest) -> AppResult<Checkpoint> {
        validate_checkpoint_flags(payload.is_start, payload.is_finish, payload.is_midpoint)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if !payload.distance_km.is_finite() {
            return Err(AppError::Validation(
                "Distance must be a finite number".to_string(),
            ));
        }

        let new_checkpoint = NewCheckpoint {
            name: sanitize_string(&payload.name),
            location: payload.location.map(|l| sanitize_string(&l)),
            distance_km: payload.distance_km,
            order_index: payload.order_index,
            is_start: payload.is_start,
            is_finish: payload.is_finish,
            is_midpoint: payload.is_midpoint,
        };

        let checkpoint = CheckpointRepository::create(pool, &new_checkpoint)
            .await
            .map_err(|e| match e {
                AppError::AlreadyExists(_) => AppError::AlreadyExists(format!(
                    "Order index {} is taken, or the course already has this role",
                    new_checkpoint.order_index
                )),
                other => other,
            })?;

        tracing::info!(
            checkpoint_id = checkpoint.id,
            order_index = checkpoint.order_index,
            role = checkpoint.role(),
            "Checkpoint created"
        );

        Ok(checkpoint)
    }

    /// Get checkpoint by ID
    pub async fn get(pool: &PgPool, id: i64) -> AppResult<Checkpoint> {
        CheckpointRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No checkpoint found with ID {}", id)))
    }

    /// The course in order
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Checkpoint>> {
        CheckpointRepository::list(pool).await
    }

    pub async fn start(pool: &PgPool) -> AppResult<Checkpoint> {
        CheckpointRepository::find_start(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("The course has no start checkpoint".to_string()))
    }

    pub async fn finish(pool: &PgPool) -> AppResult<Checkpoint> {
        CheckpointRepository::find_finish(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("The course has no finish checkpoint".to_string()))
    }

    pub async fn midpoints(pool: &PgPool) -> AppResult<Vec<Checkpoint>> {
        CheckpointRepository::list_midpoints(pool).await
    }
}
