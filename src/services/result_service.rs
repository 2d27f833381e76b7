//! Result service

use sqlx::PgPool;

use crate::{
    db::repositories::{CheckpointRepository, ResultRepository},
    error::{AppError, AppResult},
    handlers::results::response::{ResultResponse, StatisticsResponse},
    models::ResultWithAthlete,
    timing::brackets::{AgeBracket, bracket_index},
};

/// Result service for business logic
pub struct ResultService;

impl ResultService {
    /// Valid results ordered by time, filtered by gender and age group label
    pub async fn list_valid(
        pool: &PgPool,
        brackets: &[AgeBracket],
        gender: Option<&str>,
        age_group: Option<&str>,
    ) -> AppResult<Vec<ResultResponse>> {
        let bracket = age_group
            .map(|label| {
                find_bracket(brackets, label).ok_or_else(|| {
                    AppError::InvalidArgument(format!("Unknown age group '{}'", label))
                })
            })
            .transpose()?;

        let rows = ResultRepository::list_valid(
            pool,
            gender,
            bracket.map(|b| b.min),
            bracket.and_then(|b| b.max),
        )
        .await?;

        Ok(Self::to_responses(rows, brackets))
    }

    /// Results marked invalid
    pub async fn list_invalid(
        pool: &PgPool,
        brackets: &[AgeBracket],
    ) -> AppResult<Vec<ResultResponse>> {
        let rows = ResultRepository::list_invalid(pool).await?;
        Ok(Self::to_responses(rows, brackets))
    }

    /// Result of one athlete
    pub async fn athlete_result(
        pool: &PgPool,
        brackets: &[AgeBracket],
        athlete_id: i64,
    ) -> AppResult<ResultResponse> {
        let row = ResultRepository::find_with_athlete(pool, athlete_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No result recorded for athlete {}", athlete_id))
            })?;

        let label = age_group_label(brackets, row.age);
        Ok(ResultResponse::new(row, label))
    }

    /// Finisher statistics
    pub async fn statistics(pool: &PgPool) -> AppResult<StatisticsResponse> {
        let (stats, checkpoint_count) = futures::try_join!(
            ResultRepository::statistics(pool),
            CheckpointRepository::count(pool),
        )?;

        Ok(StatisticsResponse::new(stats, checkpoint_count))
    }

    fn to_responses(rows: Vec<ResultWithAthlete>, brackets: &[AgeBracket]) -> Vec<ResultResponse> {
        rows.into_iter()
            .map(|row| {
                let label = age_group_label(brackets, row.age);
                ResultResponse::new(row, label)
            })
            .collect()
    }
}

fn age_group_label(brackets: &[AgeBracket], age: i32) -> Option<String> {
    bracket_index(brackets, age).map(|i| brackets[i].label())
}

/// Match a bracket by its label; `61-` is accepted for `61+`
fn find_bracket<'a>(brackets: &'a [AgeBracket], label: &str) -> Option<&'a AgeBracket> {
    let label = label.trim();
    brackets
        .iter()
        .find(|b| b.label() == label || (b.max.is_none() && format!("{}-", b.min) == label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::brackets::parse_age_brackets;

    #[test]
    fn test_find_bracket_by_label() {
        let brackets = parse_age_brackets("18-30,31-45,61-").unwrap();
        assert_eq!(find_bracket(&brackets, "31-45"), Some(&AgeBracket::new(31, Some(45))));
        assert_eq!(find_bracket(&brackets, "61+"), Some(&AgeBracket::new(61, None)));
        assert_eq!(find_bracket(&brackets, "61-"), Some(&AgeBracket::new(61, None)));
        assert_eq!(find_bracket(&brackets, "46-60"), None);
    }

    #[test]
    fn test_age_group_label() {
        let brackets = parse_age_brackets("18-30,31-45").unwrap();
        assert_eq!(age_group_label(&brackets, 30).as_deref(), Some("18-30"));
        assert_eq!(age_group_label(&brackets, 12), None);
    }
}
