//! Finish notification port
//!
//! The engine hands a ranked, valid result to a [`Notifier`] on a spawned task after
//! the rank set is published. Delivery failures are logged and never reach the
//! caller of `ingest` or `recalculate`.

use async_trait::async_trait;

use crate::{
    models::{Athlete, RaceResult},
    utils::time::format_race_time,
};

use super::brackets::{AgeBracket, bracket_index};

/// Notification delivery errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("athlete {0} has no phone number")]
    MissingRecipient(i64),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Outbound notification of a finished race
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, athlete: &Athlete, result: &RaceResult) -> Result<(), NotifyError>;
}

/// Render the finish message sent to an athlete.
///
/// Shows the age-group rank when the athlete falls in a bracket, otherwise the
/// gender rank.
pub fn render_message(athlete: &Athlete, result: &RaceResult, brackets: &[AgeBracket]) -> String {
    let overall = result.overall_rank.unwrap_or(0);

    let (group, group_rank) = match (
        result.age_group_rank,
        bracket_index(brackets, athlete.age),
    ) {
        (Some(rank), Some(i)) => (format!("age group {}", brackets[i].label()), rank),
        _ => (
            format!("gender ({})", athlete.gender),
            result.gender_rank.unwrap_or(0),
        ),
    };

    format!(
        "[Marathon] Dear {}, your result: {}, overall ranking: {}, {} ranking: {}. \
         Thank you for participating!",
        athlete.name,
        format_race_time(result.total_time_ms),
        overall,
        group,
        group_rank
    )
}

/// Notifier that writes the rendered message to the log instead of an SMS gateway
pub struct LogNotifier {
    brackets: Vec<AgeBracket>,
}

impl LogNotifier {
    pub fn new(brackets: Vec<AgeBracket>) -> Self {
        Self { brackets }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, athlete: &Athlete, result: &RaceResult) -> Result<(), NotifyError> {
        if !athlete.has_phone() {
            return Err(NotifyError::MissingRecipient(athlete.id));
        }

        let message = render_message(athlete, result, &self.brackets);
        tracing::info!(
            athlete_id = athlete.id,
            result_id = result.id,
            message = %message,
            "Finish notification"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::brackets::parse_age_brackets;
    use chrono::Utc;

    fn athlete(age: i32, phone: Option<&str>) -> Athlete {
        Athlete {
            id: 5,
            card_token: "CARD-5".to_string(),
            name: "Lin Wei".to_string(),
            gender: "F".to_string(),
            age,
            phone: phone.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn result() -> RaceResult {
        RaceResult {
            id: 9,
            athlete_id: 5,
            total_time_ms: 2 * 3_600_000 + 10 * 60_000,
            valid: true,
            overall_rank: Some(3),
            gender_rank: Some(1),
            age_group_rank: Some(2),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_message_prefers_age_group_rank() {
        let brackets = parse_age_brackets("18-30,31-45").unwrap();
        let message = render_message(&athlete(33, None), &result(), &brackets);
        assert!(message.contains("02:10:00"));
        assert!(message.contains("overall ranking: 3"));
        assert!(message.contains("age group 31-45 ranking: 2"));
    }

    #[test]
    fn test_message_falls_back_to_gender_rank() {
        let brackets = parse_age_brackets("18-30").unwrap();
        let mut unbracketed = result();
        unbracketed.age_group_rank = None;
        let message = render_message(&athlete(70, None), &unbracketed, &brackets);
        assert!(message.contains("gender (F) ranking: 1"));
    }

    #[tokio::test]
    async fn test_log_notifier_requires_phone() {
        let notifier = LogNotifier::new(vec![]);
        let err = notifier.notify(&athlete(30, None), &result()).await.unwrap_err();
        assert!(matches!(err, NotifyError::MissingRecipient(5)));

        assert!(
            notifier
                .notify(&athlete(30, Some("13800138000")), &result())
                .await
                .is_ok()
        );
    }
}
