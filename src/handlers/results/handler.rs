//! Result handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    error::AppResult, services::ResultService, state::AppState, utils::time::format_race_time,
};

use super::{
    request::ResultsQuery,
    response::{NotificationResponse, ResultResponse, ResultsListResponse, StatisticsResponse},
};

/// Valid results, optionally filtered by gender and age group
pub async fn list_results(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> AppResult<Json<ResultsListResponse>> {
    let results = ResultService::list_valid(
        state.db(),
        state.brackets(),
        query.gender.as_deref(),
        query.age_group.as_deref(),
    )
    .await?;

    Ok(Json(ResultsListResponse {
        total: results.len(),
        results,
    }))
}

/// Results that failed validation
pub async fn list_invalid_results(
    State(state): State<AppState>,
) -> AppResult<Json<ResultsListResponse>> {
    let results = ResultService::list_invalid(state.db(), state.brackets()).await?;

    Ok(Json(ResultsListResponse {
        total: results.len(),
        results,
    }))
}

/// Result of one athlete
pub async fn get_athlete_result(
    State(state): State<AppState>,
    Path(athlete_id): Path<i64>,
) -> AppResult<Json<ResultResponse>> {
    let result = ResultService::athlete_result(state.db(), state.brackets(), athlete_id).await?;
    Ok(Json(result))
}

/// Resend the finish notification for an athlete's valid result
pub async fn notify_athlete_result(
    State(state): State<AppState>,
    Path(athlete_id): Path<i64>,
) -> AppResult<Json<NotificationResponse>> {
    let result = state.engine().notify_result(athlete_id).await?;

    Ok(Json(NotificationResponse {
        athlete_id: result.athlete_id,
        result_id: result.id,
        total_time: format_race_time(result.total_time_ms),
        status: "sent",
    }))
}

/// Finisher counts and finish time aggregates
pub async fn get_statistics(State(state): State<AppState>) -> AppResult<Json<StatisticsResponse>> {
    let stats = ResultService::statistics(state.db()).await?;
    Ok(Json(stats))
}
