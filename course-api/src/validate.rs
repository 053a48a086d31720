/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Input validation helpers. Each returns `AppError::Validation` with a
//! message naming the offending field.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 255;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
            .expect("email pattern is a valid regex")
    })
}

/// Trim and lowercase an email, then check its shape.
pub fn email(raw: &str) -> Result<String, AppError> {
    let normalized = raw.trim().to_lowercase();
    if email_regex().is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(AppError::validation("email is not valid"))
    }
}

pub fn password(raw: &str) -> Result<(), AppError> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Non-empty after trimming, with no length cap. Used for free text like
/// testimonials and links.
pub fn required(field: &str, raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Non-empty after trimming and at most [`MAX_NAME_LEN`] characters.
pub fn required_text(field: &str, raw: &str) -> Result<String, AppError> {
    let trimmed = required(field, raw)?;
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed)
}

pub fn price(value: i64) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::validation("price must not be negative"));
    }
    Ok(())
}

pub fn discount(value: i32) -> Result<(), AppError> {
    if !(0..=100).contains(&value) {
        return Err(AppError::validation("discount must be between 0 and 100"));
    }
    Ok(())
}

pub fn capacity(value: i32) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::validation("capacity must not be negative"));
    }
    Ok(())
}

pub fn module_number(value: i32) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::validation("no_module must not be negative"));
    }
    Ok(())
}

pub fn rating(value: i32) -> Result<(), AppError> {
    if !(1..=5).contains(&value) {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }
    Ok(())
}

pub fn grade(value: i32) -> Result<(), AppError> {
    if !(0..=100).contains(&value) {
        return Err(AppError::validation("grade must be between 0 and 100"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(email("  Alice@Example.COM ").unwrap(), "alice@example.com");
    }

    #[test]
    fn bad_emails_are_rejected() {
        for raw in ["", "alice", "alice@", "@example.com", "a b@example.com", "a@b"] {
            assert!(email(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(password("1234567").is_err());
        assert!(password("12345678").is_ok());
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("name", "  Rust 101 ").unwrap(), "Rust 101");
        assert!(required_text("name", "   ").is_err());
        assert!(required_text("name", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn free_text_is_not_capped() {
        let long = "y".repeat(MAX_NAME_LEN * 4);
        assert_eq!(required("testimonial", &long).unwrap(), long);
        assert!(required("testimonial", " \t ").is_err());
    }

    #[test]
    fn numeric_ranges() {
        assert!(price(-1).is_err());
        assert!(price(0).is_ok());
        assert!(discount(101).is_err());
        assert!(discount(100).is_ok());
        assert!(capacity(-1).is_err());
        assert!(rating(0).is_err());
        assert!(rating(6).is_err());
        assert!(rating(5).is_ok());
        assert!(grade(100).is_ok());
        assert!(grade(-1).is_err());
        assert!(module_number(-1).is_err());
    }
}
