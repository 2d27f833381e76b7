//! Athlete service

use sqlx::PgPool;

use crate::{
    db::repositories::AthleteRepository,
    error::{AppError, AppResult},
    handlers::athletes::request::CreateAthleteRequest,
    models::{Athlete, NewAthlete},
    utils::validation::{sanitize_string, validate_card_token, validate_gender},
};

/// Athlete service for business logic
pub struct AthleteService;

impl AthleteService {
    /// Register an athlete
    pub async fn register(pool: &PgPool, payload: CreateAthleteRequest) -> AppResult<Athlete> {
        let card_token = payload.card_token.trim().to_string();
        validate_card_token(&card_token).map_err(|e| AppError::Validation(e.to_string()))?;
        validate_gender(&payload.gender).map_err(|e| AppError::Validation(e.to_string()))?;

        let name = sanitize_string(&payload.name);
        if name.is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }

        let new_athlete = NewAthlete {
            card_token,
            name,
            gender: payload.gender.trim().to_string(),
            age: payload.age,
            phone: payload
                .phone
                .map(|p| sanitize_string(&p))
                .filter(|p| !p.is_empty()),
        };

        let athlete = AthleteRepository::create(pool, &new_athlete)
            .await
            .map_err(|e| match e {
                AppError::AlreadyExists(_) => AppError::AlreadyExists(format!(
                    "Card token {} is already registered",
                    new_athlete.card_token
                )),
                other => other,
            })?;

        tracing::info!(
            athlete_id = athlete.id,
            card_token = %athlete.card_token,
            "Athlete registered"
        );

        Ok(athlete)
    }

    /// Get athlete by ID
    pub async fn get(pool: &PgPool, id: i64) -> AppResult<Athlete> {
        AthleteRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No athlete found with ID {}", id)))
    }

    /// List athletes with pagination
    pub async fn list(
        pool: &PgPool,
        page: u32,
        per_page: u32,
        gender: Option<&str>,
    ) -> AppResult<(Vec<Athlete>, i64)> {
        let offset = (page.saturating_sub(1) as i64) * per_page as i64;
        let limit = per_page as i64;

        AthleteRepository::list(pool, offset, limit, gender).await
    }
}
