//! Checkpoint handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{error::AppResult, services::CheckpointService, state::AppState};

use super::{
    request::CreateCheckpointRequest,
    response::{CheckpointResponse, CheckpointsListResponse},
};

/// Add a checkpoint to the course
pub async fn create_checkpoint(
    State(state): State<AppState>,
    Json(payload): Json<CreateCheckpointRequest>,
) -> AppResult<(StatusCode, Json<CheckpointResponse>)> {
    payload.validate()?;

    let checkpoint = CheckpointService::create(state.db(), payload).await?;

    Ok((StatusCode::CREATED, Json(checkpoint.into())))
}

/// List the course in order
pub async fn list_checkpoints(
    State(state): State<AppState>,
) -> AppResult<Json<CheckpointsListResponse>> {
    let checkpoints = CheckpointService::list(state.db()).await?;
    Ok(Json(checkpoints.into()))
}

/// Get a specific checkpoint
pub async fn get_checkpoint(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CheckpointResponse>> {
    let checkpoint = CheckpointService::get(state.db(), id).await?;
    Ok(Json(checkpoint.into()))
}

pub async fn get_start(State(state): State<AppState>) -> AppResult<Json<CheckpointResponse>> {
    let checkpoint = CheckpointService::start(state.db()).await?;
    Ok(Json(checkpoint.into()))
}

pub async fn get_finish(State(state): State<AppState>) -> AppResult<Json<CheckpointResponse>> {
    let checkpoint = CheckpointService::finish(state.db()).await?;
    Ok(Json(checkpoint.into()))
}

pub async fn list_midpoints(
    State(state): State<AppState>,
) -> AppResult<Json<CheckpointsListResponse>> {
    let checkpoints = CheckpointService::midpoints(state.db()).await?;
    Ok(Json(checkpoints.into()))
}
