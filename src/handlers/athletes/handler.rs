//! Athlete handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::AppResult,
    services::AthleteService,
    state::AppState,
};

use super::{
    request::{CreateAthleteRequest, ListAthletesQuery},
    response::{AthleteResponse, AthletesListResponse},
};

/// Register a new athlete
pub async fn create_athlete(
    State(state): State<AppState>,
    Json(payload): Json<CreateAthleteRequest>,
) -> AppResult<(StatusCode, Json<AthleteResponse>)> {
    payload.validate()?;

    let athlete = AthleteService::register(state.db(), payload).await?;

    Ok((StatusCode::CREATED, Json(athlete.into())))
}

/// List registered athletes
pub async fn list_athletes(
    State(state): State<AppState>,
    Query(query): Query<ListAthletesQuery>,
) -> AppResult<Json<AthletesListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let (athletes, total) =
        AthleteService::list(state.db(), page, per_page, query.gender.as_deref()).await?;

    Ok(Json(AthletesListResponse {
        athletes: athletes.into_iter().map(Into::into).collect(),
        total,
        page,
        per_page,
    }))
}

/// Get a specific athlete
pub async fn get_athlete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AthleteResponse>> {
    let athlete = AthleteService::get(state.db(), id).await?;
    Ok(Json(athlete.into()))
}
