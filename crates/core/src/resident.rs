//! Field rules for resident records.

use crate::error::CoreError;

/// Accepted values of the `gender` column.
pub const GENDERS: &[&str] = &["M", "F", "X"];

/// Badges are positive integers.
pub fn validate_badge(badge: i32) -> Result<(), CoreError> {
    if badge <= 0 {
        return Err(CoreError::Validation("badge must be a positive number".into()));
    }
    Ok(())
}

/// Names must contain something besides whitespace.
pub fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_gender(gender: &str) -> Result<(), CoreError> {
    if !GENDERS.contains(&gender) {
        return Err(CoreError::Validation(format!(
            "Invalid gender '{gender}'. Must be one of: {}",
            GENDERS.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn badge_must_be_positive() {
        assert!(validate_badge(24191).is_ok());
        assert_matches!(validate_badge(0), Err(CoreError::Validation(_)));
        assert_matches!(validate_badge(-3), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(validate_name("first_name", "Ann").is_ok());
        assert_matches!(
            validate_name("last_name", "   "),
            Err(CoreError::Validation(m)) if m == "last_name is required"
        );
    }

    #[test]
    fn gender_whitelist() {
        assert!(validate_gender("X").is_ok());
        assert_matches!(validate_gender("m"), Err(CoreError::Validation(_)));
    }
}
