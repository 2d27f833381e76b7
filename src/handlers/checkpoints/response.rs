//! Checkpoint response DTOs

use serde::Serialize;

use crate::models::Checkpoint;

/// Checkpoint response
#[derive(Debug, Serialize)]
pub struct CheckpointResponse {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub distance_km: f64,
    pub order_index: i32,
    /// start, finish, midpoint or waypoint
    pub role: &'static str,
    pub is_start: bool,
    pub is_finish: bool,
    pub is_midpoint: bool,
}

impl From<Checkpoint> for CheckpointResponse {
    fn from(checkpoint: Checkpoint) -> Self {
        Self {
            role: checkpoint.role(),
            id: checkpoint.id,
            name: checkpoint.name,
            location: checkpoint.location,
            distance_km: checkpoint.distance_km,
            order_index: checkpoint.order_index,
            is_start: checkpoint.is_start,
            is_finish: checkpoint.is_finish,
            is_midpoint: checkpoint.is_midpoint,
        }
    }
}

/// Checkpoint list response
#[derive(Debug, Serialize)]
pub struct CheckpointsListResponse {
    pub checkpoints: Vec<CheckpointResponse>,
    pub total: usize,
}

impl From<Vec<Checkpoint>> for CheckpointsListResponse {
    fn from(checkpoints: Vec<Checkpoint>) -> Self {
        Self {
            total: checkpoints.len(),
            checkpoints: checkpoints.into_iter().map(Into::into).collect(),
        }
    }
}
