//! Timing request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{MAX_CARD_TOKEN_LENGTH, MAX_LEADERBOARD_LIMIT};

/// One checkpoint pass, from the scanner feed or entered manually
#[derive(Debug, Deserialize, Validate)]
pub struct PassEventRequest {
    #[validate(length(min = 1, max = MAX_CARD_TOKEN_LENGTH))]
    pub athlete_card_token: String,

    pub checkpoint_id: i64,

    /// ISO-8601 date-time
    #[validate(length(min = 1))]
    pub timestamp: String,
}

/// Leaderboard query parameters
#[derive(Debug, Deserialize, Validate)]
pub struct LeaderboardQuery {
    #[validate(range(max = MAX_LEADERBOARD_LIMIT))]
    pub limit: Option<i64>,
}
