//! Race result handlers

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

/// Result routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_results))
        .route("/invalid", get(handler::list_invalid_results))
        .route("/statistics", get(handler::get_statistics))
        .route("/athlete/{athlete_id}", get(handler::get_athlete_result))
        .route("/athlete/{athlete_id}/notify", post(handler::notify_athlete_result))
}
