//! Athlete repository

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Athlete, NewAthlete},
};

/// Repository for athlete database operations
pub struct AthleteRepository;

impl AthleteRepository {
    /// Register a new athlete
    pub async fn create(pool: &PgPool, athlete: &NewAthlete) -> AppResult<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(
            r#"
            INSERT INTO athletes (card_token, name, gender, age, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&athlete.card_token)
        .bind(&athlete.name)
        .bind(&athlete.gender)
        .bind(athlete.age)
        .bind(&athlete.phone)
        .fetch_one(pool)
        .await?;

        Ok(athlete)
    }

    /// Find athlete by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Athlete>> {
        let athlete = sqlx::query_as::<_, Athlete>(r#"SELECT * FROM athletes WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(athlete)
    }

    /// Find athlete by RFID card token
    pub async fn find_by_card_token(pool: &PgPool, card_token: &str) -> AppResult<Option<Athlete>> {
        let athlete =
            sqlx::query_as::<_, Athlete>(r#"SELECT * FROM athletes WHERE card_token = $1"#)
                .bind(card_token)
                .fetch_optional(pool)
                .await?;

        Ok(athlete)
    }

    /// List athletes with pagination, optionally filtered by gender
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        gender: Option<&str>,
    ) -> AppResult<(Vec<Athlete>, i64)> {
        let athletes = sqlx::query_as::<_, Athlete>(
            r#"
            SELECT * FROM athletes
            WHERE ($1::text IS NULL OR gender = $1)
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(gender)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM athletes WHERE ($1::text IS NULL OR gender = $1)"#,
        )
        .bind(gender)
        .fetch_one(pool)
        .await?;

        Ok((athletes, count))
    }
}
