//! Request field validation helpers

use crate::core::error::ValidationError;
use regex::Regex;
use std::sync::OnceLock;

fn username_regex() -> &'static Regex {
    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    USERNAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap())
}

/// Usernames allow alphanumerics, underscores and dashes only
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username_regex().is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::field(
            "username",
            "Username cannot contain special characters other than underscores and dashes.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_accepts_word_characters() {
        assert!(validate_username("player_one").is_ok());
        assert!(validate_username("Player-2").is_ok());
    }

    #[test]
    fn test_username_rejects_special_characters() {
        assert!(validate_username("player one").is_err());
        assert!(validate_username("player!").is_err());
        assert!(validate_username("").is_err());
    }

}
