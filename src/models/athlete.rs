//! Athlete model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Athlete database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Athlete {
    pub id: i64,
    /// RFID card token carried during the race
    pub card_token: String,
    pub name: String,
    /// Free-form gender label, used as a ranking group key
    pub gender: String,
    pub age: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Registration data for a new athlete
#[derive(Debug, Clone)]
pub struct NewAthlete {
    pub card_token: String,
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub phone: Option<String>,
}

impl Athlete {
    /// Check if the athlete left a phone number for notifications
    pub fn has_phone(&self) -> bool {
        self.phone
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }
}
