//! Checkpoint model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::constants::checkpoint_roles;

/// Course checkpoint database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    /// Distance from the start line in kilometres
    pub distance_km: f64,
    /// Position on the course, unique
    pub order_index: i32,
    pub is_start: bool,
    pub is_finish: bool,
    pub is_midpoint: bool,
    pub created_at: DateTime<Utc>,
}

/// Definition of a new course checkpoint
#[derive(Debug, Clone)]
pub struct NewCheckpoint {
    pub name: String,
    pub location: Option<String>,
    pub distance_km: f64,
    pub order_index: i32,
    pub is_start: bool,
    pub is_finish: bool,
    pub is_midpoint: bool,
}

impl Checkpoint {
    /// Role label of the checkpoint on the course
    pub fn role(&self) -> &'static str {
        if self.is_start {
            checkpoint_roles::START
        } else if self.is_finish {
            checkpoint_roles::FINISH
        } else if self.is_midpoint {
            checkpoint_roles::MIDPOINT
        } else {
            checkpoint_roles::WAYPOINT
        }
    }
}
