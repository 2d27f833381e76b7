//! Timing handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::EventSource,
    services::TimingService,
    state::AppState,
    timing::{Evaluation, IngestReport},
};

use super::{
    request::{LeaderboardQuery, PassEventRequest},
    response::{LeaderboardResponse, TimelineResponse},
};

/// Record a pass from the scanner feed
pub async fn record_feed_event(
    State(state): State<AppState>,
    Json(payload): Json<PassEventRequest>,
) -> AppResult<(StatusCode, Json<IngestReport>)> {
    ingest(&state, payload, EventSource::Feed).await
}

/// Record a manually entered pass
pub async fn record_manual_event(
    State(state): State<AppState>,
    Json(payload): Json<PassEventRequest>,
) -> AppResult<(StatusCode, Json<IngestReport>)> {
    ingest(&state, payload, EventSource::Manual).await
}

async fn ingest(
    state: &AppState,
    payload: PassEventRequest,
    source: EventSource,
) -> AppResult<(StatusCode, Json<IngestReport>)> {
    payload.validate()?;

    let report = state
        .engine()
        .ingest(
            &payload.athlete_card_token,
            payload.checkpoint_id,
            &payload.timestamp,
            source,
        )
        .await?;

    // A repeated scan is accepted but creates nothing
    let status = if report.pass.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(report)))
}

/// Re-run completion evaluation for an athlete
pub async fn recalculate(
    State(state): State<AppState>,
    Path(athlete_id): Path<i64>,
) -> AppResult<Json<Evaluation>> {
    let evaluation = state.engine().recalculate(athlete_id).await?;
    Ok(Json(evaluation))
}

/// Fastest valid results
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<LeaderboardResponse>> {
    query.validate()?;

    let results = state.engine().leaderboard(query.limit).await?;

    Ok(Json(LeaderboardResponse {
        count: results.len(),
        entries: results.into_iter().map(Into::into).collect(),
    }))
}

/// An athlete's passes in time order
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(athlete_id): Path<i64>,
) -> AppResult<Json<TimelineResponse>> {
    let passes = TimingService::timeline(state.db(), athlete_id).await?;
    Ok(Json(TimelineResponse { athlete_id, passes }))
}
