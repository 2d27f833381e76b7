//! Pass record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::constants::event_sources;

/// Evidence that an athlete was scanned at a checkpoint
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PassRecord {
    pub id: i64,
    pub athlete_id: i64,
    pub checkpoint_id: i64,
    pub pass_time: DateTime<Utc>,
    /// Where the event came from: feed or manual
    pub source: String,
    pub recorded_at: DateTime<Utc>,
}

/// Where a pass event originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// Automated scanner feed
    Feed,
    /// Manually entered correction
    Manual,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => event_sources::FEED,
            Self::Manual => event_sources::MANUAL,
        }
    }
}

impl std::fmt::Display for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of storing a pass for an (athlete, checkpoint) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassOutcome {
    /// First pass for the pair, stored as given
    Created { pass_time: DateTime<Utc> },
    /// The pair was already recorded; the stored time is kept
    AlreadyRecorded { pass_time: DateTime<Utc> },
}

impl PassOutcome {
    /// Pass time held by the store after the upsert
    pub fn stored_time(&self) -> DateTime<Utc> {
        match self {
            Self::Created { pass_time } | Self::AlreadyRecorded { pass_time } => *pass_time,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// A pass joined with its checkpoint, as shown on an athlete timeline
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimelineEntry {
    pub checkpoint_id: i64,
    pub checkpoint_name: String,
    pub order_index: i32,
    pub distance_km: f64,
    pub pass_time: DateTime<Utc>,
    pub source: String,
}
