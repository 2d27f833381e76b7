//! RaceTime - Race Timing and Ranking Service
//!
//! This library turns RFID checkpoint scans into athlete timelines, finish
//! results and rankings for a distance race.
//!
//! # Features
//!
//! - Idempotent pass ingestion from a scanner feed or manual entry
//! - Completion evaluation with elapsed time and course validity
//! - Dense overall, gender and age-group rankings published atomically
//! - Asynchronous finish notifications
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Registration and read-side queries
//! - **Timing**: The timing engine and its storage ports
//! - **Repositories**: Database access
//! - **Models**: Domain models

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod timing;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
pub use timing::TimingEngine;
