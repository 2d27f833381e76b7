//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod athletes;
pub mod checkpoints;
pub mod health;
pub mod results;
pub mod timing;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/athletes", athletes::routes())
        .nest("/checkpoints", checkpoints::routes())
        .nest("/timing", timing::routes())
        .nest("/results", results::routes())
}
