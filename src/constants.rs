//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// TIMING DEFAULTS
// =============================================================================

/// Number of entries returned by the leaderboard when no limit is given
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// Upper bound for a single leaderboard request
pub const MAX_LEADERBOARD_LIMIT: i64 = 1000;

/// Default age brackets, closed ranges; an empty upper bound is open-ended
pub const DEFAULT_AGE_BRACKETS: &str = "18-30,31-45,46-60,61-";

/// Whether finish notifications are dispatched by default
pub const DEFAULT_NOTIFICATIONS_ENABLED: bool = true;

/// Checkpoint roles
pub mod checkpoint_roles {
    pub const START: &str = "start";
    pub const MIDPOINT: &str = "midpoint";
    pub const FINISH: &str = "finish";
    pub const WAYPOINT: &str = "waypoint";
}

/// Sources a pass event can come from
pub mod event_sources {
    pub const FEED: &str = "feed";
    pub const MANUAL: &str = "manual";
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// Current API version
pub const API_VERSION: &str = "v1";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum card token length
pub const MAX_CARD_TOKEN_LENGTH: u64 = 64;

/// Maximum athlete name length
pub const MAX_ATHLETE_NAME_LENGTH: u64 = 128;

/// Maximum gender label length
pub const MAX_GENDER_LENGTH: u64 = 32;

/// Maximum athlete age accepted at registration
pub const MAX_ATHLETE_AGE: i32 = 130;

/// Maximum checkpoint name length
pub const MAX_CHECKPOINT_NAME_LENGTH: u64 = 128;

/// Maximum checkpoint location length
pub const MAX_CHECKPOINT_LOCATION_LENGTH: u64 = 256;

/// Maximum phone number length
pub const MAX_PHONE_LENGTH: u64 = 32;

/// Default page size for athlete listings
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Maximum page size for athlete listings
pub const MAX_PAGE_SIZE: u32 = 500;
