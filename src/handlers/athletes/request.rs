//! Athlete request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{
    MAX_ATHLETE_AGE, MAX_ATHLETE_NAME_LENGTH, MAX_CARD_TOKEN_LENGTH, MAX_GENDER_LENGTH,
    MAX_PHONE_LENGTH,
};

/// Register athlete request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAthleteRequest {
    /// RFID card token
    #[validate(length(min = 1, max = MAX_CARD_TOKEN_LENGTH))]
    pub card_token: String,

    #[validate(length(min = 1, max = MAX_ATHLETE_NAME_LENGTH))]
    pub name: String,

    #[validate(length(min = 1, max = MAX_GENDER_LENGTH))]
    pub gender: String,

    #[validate(range(min = 0, max = MAX_ATHLETE_AGE))]
    pub age: i32,

    #[validate(length(max = MAX_PHONE_LENGTH))]
    pub phone: Option<String>,
}

/// List athletes query parameters
#[derive(Debug, Deserialize)]
pub struct ListAthletesQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub gender: Option<String>,
}
