//! Utility functions

pub mod time;
pub mod validation;

pub use time::{format_race_time, parse_timestamp};
pub use validation::{
    sanitize_string, validate_card_token, validate_checkpoint_flags, validate_gender,
};
