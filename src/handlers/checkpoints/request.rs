//! Checkpoint request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{MAX_CHECKPOINT_LOCATION_LENGTH, MAX_CHECKPOINT_NAME_LENGTH};

/// Create checkpoint request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCheckpointRequest {
    #[validate(length(min = 1, max = MAX_CHECKPOINT_NAME_LENGTH))]
    pub name: String,

    #[validate(length(max = MAX_CHECKPOINT_LOCATION_LENGTH))]
    pub location: Option<String>,

    /// Distance from the start line in kilometres
    #[validate(range(min = 0.0))]
    pub distance_km: f64,

    /// Position on the course, unique
    pub order_index: i32,

    #[serde(default)]
    pub is_start: bool,

    #[serde(default)]
    pub is_finish: bool,

    #[serde(default)]
    pub is_midpoint: bool,
}
