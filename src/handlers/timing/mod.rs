//! Race timing handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Timing routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Pass ingestion
        .route("/events", post(handler::record_feed_event))
        .route("/manual", post(handler::record_manual_event))
        .route("/recalculate/{athlete_id}", post(handler::recalculate))
        // Reads
        .route("/leaderboard", get(handler::get_leaderboard))
        .route("/records/{athlete_id}", get(handler::get_timeline))
}
