//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{config::Config, timing::{AgeBracket, TimingEngine}};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    pub db: PgPool,

    /// Race timing engine
    pub engine: TimingEngine,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: PgPool, engine: TimingEngine, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { db, engine, config }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a reference to the timing engine
    pub fn engine(&self) -> &TimingEngine {
        &self.inner.engine
    }

    /// Configured age brackets
    pub fn brackets(&self) -> &[AgeBracket] {
        &self.inner.config.timing.age_brackets
    }
}
