use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AppError, AppResult};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
    })
}

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z0-9_-]{2,32}$").expect("valid code regex"))
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !email_regex().is_match(email) {
        return Err(AppError::ValidationError(format!(
            "Invalid email address: {email}"
        )));
    }
    Ok(())
}

/// Mexican phone numbers: 10 digits, optional +52 prefix
pub fn validate_phone(phone: &str) -> AppResult<()> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let national = digits.strip_prefix("52").filter(|d| d.len() == 10).unwrap_or(&digits);
    if national.len() != 10 {
        return Err(AppError::ValidationError(
            "Phone number must have 10 digits".to_string(),
        ));
    }
    Ok(())
}

/// Business codes (customer, branch, promotion): upper-case letters, digits, `-` and `_`
pub fn validate_code(field: &str, code: &str) -> AppResult<()> {
    if !code_regex().is_match(code) {
        return Err(AppError::ValidationError(format!(
            "{field} must be 2-32 upper-case letters, digits, '-' or '_'"
        )));
    }
    Ok(())
}

pub fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

pub fn require_positive(field: &str, value: i64) -> AppResult<()> {
    if value <= 0 {
        return Err(AppError::ValidationError(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

/// Largest quantity accepted on an order line or a stock movement
pub const MAX_QUANTITY: i32 = 1_000_000;

pub fn require_at_most(field: &str, value: i64, max: i64) -> AppResult<()> {
    if value > max {
        return Err(AppError::ValidationError(format!(
            "{field} cannot exceed {max}"
        )));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: i64) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::ValidationError(format!(
            "{field} cannot be negative"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@dla.com").is_ok());
        assert!(validate_email("ventas.norte@dla.com.mx").is_ok());
        assert!(validate_email("admin@").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("5512345678").is_ok());
        assert!(validate_phone("+52 55 1234 5678").is_ok());
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn test_validate_code() {
        assert!(validate_code("code", "MATRIZ").is_ok());
        assert!(validate_code("code", "CLI-0001").is_ok());
        assert!(validate_code("code", "matriz").is_err());
        assert!(validate_code("code", "X").is_err());
    }

    #[test]
    fn test_numeric_rules() {
        assert!(require_positive("points", 1).is_ok());
        assert!(require_positive("points", 0).is_err());
        assert!(require_non_negative("limit", 0).is_ok());
        assert!(require_non_negative("limit", -1).is_err());
    }
}
