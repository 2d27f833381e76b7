//! Course checkpoint handlers

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

/// Checkpoint routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_checkpoint))
        .route("/", get(handler::list_checkpoints))
        // Course roles
        .route("/start", get(handler::get_start))
        .route("/finish", get(handler::get_finish))
        .route("/midpoints", get(handler::list_midpoints))
        .route("/{id}", get(handler::get_checkpoint))
}
