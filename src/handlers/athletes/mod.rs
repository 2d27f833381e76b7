//! Athlete registration handlers

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

/// Athlete routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_athlete))
        .route("/", get(handler::list_athletes))
        .route("/{id}", get(handler::get_athlete))
}
