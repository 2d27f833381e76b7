//! Input validation utilities

use crate::constants::{MAX_CARD_TOKEN_LENGTH, MAX_GENDER_LENGTH};

/// Validate RFID card token format
pub fn validate_card_token(token: &str) -> Result<(), &'static str> {
    if token.is_empty() {
        return Err("Card token cannot be empty");
    }
    if token.len() > MAX_CARD_TOKEN_LENGTH as usize {
        return Err("Card token is too long");
    }
    if !token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
    {
        return Err("Card token can only contain letters, digits, '-', '_' and ':'");
    }
    Ok(())
}

/// Validate a gender label; any non-blank label is accepted as its own group
pub fn validate_gender(gender: &str) -> Result<(), &'static str> {
    let trimmed = gender.trim();
    if trimmed.is_empty() {
        return Err("Gender cannot be empty");
    }
    if trimmed.len() > MAX_GENDER_LENGTH as usize {
        return Err("Gender label is too long");
    }
    Ok(())
}

/// Validate the role flags of a checkpoint
pub fn validate_checkpoint_flags(
    is_start: bool,
    is_finish: bool,
    is_midpoint: bool,
) -> Result<(), &'static str> {
    if is_start && is_finish {
        return Err("A checkpoint cannot be both start and finish");
    }
    if is_midpoint && (is_start || is_finish) {
        return Err("Start and finish checkpoints cannot be midpoints");
    }
    Ok(())
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_card_token() {
        assert!(validate_card_token("RFID-0001").is_ok());
        assert!(validate_card_token("04:A2:19:7F").is_ok());
        assert!(validate_card_token("").is_err());
        assert!(validate_card_token("card 1").is_err());
        assert!(validate_card_token(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_gender() {
        assert!(validate_gender("F").is_ok());
        assert!(validate_gender("non-binary").is_ok());
        assert!(validate_gender("   ").is_err());
    }

    #[test]
    fn test_validate_checkpoint_flags() {
        assert!(validate_checkpoint_flags(true, false, false).is_ok());
        assert!(validate_checkpoint_flags(false, false, true).is_ok());
        assert!(validate_checkpoint_flags(true, true, false).is_err());
        assert!(validate_checkpoint_flags(false, true, true).is_err());
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  Lin\u{0007} Wei \n"), "Lin Wei");
    }
}
