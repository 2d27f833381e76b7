//! Race result repository

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{RaceResult, RaceStatistics, RankAssignment, ResultWithAthlete, ValidFinisher},
};

const RESULT_WITH_ATHLETE_COLUMNS: &str = r#"
    r.id AS result_id,
    r.athlete_id,
    a.name,
    a.gender,
    a.age,
    r.total_time_ms,
    r.valid,
    r.overall_rank,
    r.gender_rank,
    r.age_group_rank
"#;

/// Repository for race result database operations
pub struct ResultRepository;

impl ResultRepository {
    /// Create or replace the athlete's result, keeping any ranks until the next publish
    pub async fn upsert_by_athlete(
        pool: &PgPool,
        athlete_id: i64,
        total_time_ms: i64,
        valid: bool,
    ) -> AppResult<RaceResult> {
        let result = sqlx::query_as::<_, RaceResult>(
            r#"
            INSERT INTO race_results (athlete_id, total_time_ms, valid)
            VALUES ($1, $2, $3)
            ON CONFLICT (athlete_id) DO UPDATE
            SET total_time_ms = EXCLUDED.total_time_ms,
                valid = EXCLUDED.valid,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(athlete_id)
        .bind(total_time_ms)
        .bind(valid)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Find the result of an athlete
    pub async fn find_by_athlete(pool: &PgPool, athlete_id: i64) -> AppResult<Option<RaceResult>> {
        let result =
            sqlx::query_as::<_, RaceResult>(r#"SELECT * FROM race_results WHERE athlete_id = $1"#)
                .bind(athlete_id)
                .fetch_optional(pool)
                .await?;

        Ok(result)
    }

    /// Every valid result with the athlete's gender and age
    pub async fn all_valid(pool: &PgPool) -> AppResult<Vec<ValidFinisher>> {
        let finishers = sqlx::query_as::<_, ValidFinisher>(
            r#"
            SELECT r.id AS result_id, r.athlete_id, r.total_time_ms, a.gender, a.age
            FROM race_results r
            JOIN athletes a ON a.id = r.athlete_id
            WHERE r.valid
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(finishers)
    }

    /// Replace the whole rank set in one transaction
    pub async fn persist_ranks(pool: &PgPool, batch: &[RankAssignment]) -> AppResult<()> {
        let ids: Vec<i64> = batch.iter().map(|a| a.result_id).collect();
        let overall: Vec<i32> = batch.iter().map(|a| a.overall_rank).collect();
        let gender: Vec<i32> = batch.iter().map(|a| a.gender_rank).collect();
        let age_group: Vec<Option<i32>> = batch.iter().map(|a| a.age_group_rank).collect();

        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE race_results
            SET overall_rank = NULL, gender_rank = NULL, age_group_rank = NULL
            WHERE overall_rank IS NOT NULL
               OR gender_rank IS NOT NULL
               OR age_group_rank IS NOT NULL
            "#,
        )
        .execute(&mut *tx)
        .await?;

        if !batch.is_empty() {
            sqlx::query(
                r#"
                UPDATE race_results AS r
                SET overall_rank = b.overall_rank,
                    gender_rank = b.gender_rank,
                    age_group_rank = b.age_group_rank
                FROM UNNEST($1::bigint[], $2::int[], $3::int[], $4::int[])
                    AS b(id, overall_rank, gender_rank, age_group_rank)
                WHERE r.id = b.id
                "#,
            )
            .bind(&ids)
            .bind(&overall)
            .bind(&gender)
            .bind(&age_group)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// The fastest valid results
    pub async fn top_valid(pool: &PgPool, limit: i64) -> AppResult<Vec<RaceResult>> {
        let results = sqlx::query_as::<_, RaceResult>(
            r#"
            SELECT * FROM race_results
            WHERE valid
            ORDER BY total_time_ms, athlete_id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(results)
    }

    /// Valid results with athlete details, optionally filtered by gender and age range
    pub async fn list_valid(
        pool: &PgPool,
        gender: Option<&str>,
        min_age: Option<i32>,
        max_age: Option<i32>,
    ) -> AppResult<Vec<ResultWithAthlete>> {
        let query = format!(
            r#"
            SELECT {}
            FROM race_results r
            JOIN athletes a ON a.id = r.athlete_id
            WHERE r.valid
                AND ($1::text IS NULL OR a.gender = $1)
                AND ($2::int IS NULL OR a.age >= $2)
                AND ($3::int IS NULL OR a.age <= $3)
            ORDER BY r.total_time_ms, r.athlete_id
            "#,
            RESULT_WITH_ATHLETE_COLUMNS
        );

        let results = sqlx::query_as::<_, ResultWithAthlete>(&query)
            .bind(gender)
            .bind(min_age)
            .bind(max_age)
            .fetch_all(pool)
            .await?;

        Ok(results)
    }

    /// Invalid results with athlete details
    pub async fn list_invalid(pool: &PgPool) -> AppResult<Vec<ResultWithAthlete>> {
        let query = format!(
            r#"
            SELECT {}
            FROM race_results r
            JOIN athletes a ON a.id = r.athlete_id
            WHERE NOT r.valid
            ORDER BY r.athlete_id
            "#,
            RESULT_WITH_ATHLETE_COLUMNS
        );

        let results = sqlx::query_as::<_, ResultWithAthlete>(&query)
            .fetch_all(pool)
            .await?;

        Ok(results)
    }

    /// Result of one athlete with athlete details
    pub async fn find_with_athlete(
        pool: &PgPool,
        athlete_id: i64,
    ) -> AppResult<Option<ResultWithAthlete>> {
        let query = format!(
            r#"
            SELECT {}
            FROM race_results r
            JOIN athletes a ON a.id = r.athlete_id
            WHERE r.athlete_id = $1
            "#,
            RESULT_WITH_ATHLETE_COLUMNS
        );

        let result = sqlx::query_as::<_, ResultWithAthlete>(&query)
            .bind(athlete_id)
            .fetch_optional(pool)
            .await?;

        Ok(result)
    }

    /// Finisher counts and valid finish time aggregates
    pub async fn statistics(pool: &PgPool) -> AppResult<RaceStatistics> {
        let stats = sqlx::query_as::<_, RaceStatistics>(
            r#"
            SELECT
                COUNT(*) AS total_results,
                COUNT(*) FILTER (WHERE valid) AS valid_results,
                COUNT(*) FILTER (WHERE NOT valid) AS invalid_results,
                ROUND(AVG(total_time_ms) FILTER (WHERE valid))::BIGINT AS average_finish_ms,
                MIN(total_time_ms) FILTER (WHERE valid) AS fastest_finish_ms
            FROM race_results
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }
}
