//! Athlete response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Athlete;

/// Athlete response
#[derive(Debug, Serialize)]
pub struct AthleteResponse {
    pub id: i64,
    pub card_token: String,
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub has_phone: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Athlete> for AthleteResponse {
    fn from(athlete: Athlete) -> Self {
        let has_phone = athlete.has_phone();
        Self {
            id: athlete.id,
            card_token: athlete.card_token,
            name: athlete.name,
            gender: athlete.gender,
            age: athlete.age,
            has_phone,
            created_at: athlete.created_at,
        }
    }
}

/// Athlete list response
#[derive(Debug, Serialize)]
pub struct AthletesListResponse {
    pub athletes: Vec<AthleteResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
