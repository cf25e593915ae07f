//! Staff account passwords: strength rules and bcrypt hashing.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::error::{AppError, AppResult};

const MIN_LEN: usize = 8;
/// bcrypt ignores everything past 72 bytes
const MAX_BYTES: usize = 72;

/// First strength rule a password breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordIssue {
    TooShort,
    TooLong,
    MissingLowercase,
    MissingUppercase,
    MissingDigit,
}

impl PasswordIssue {
    pub fn message(&self) -> String {
        match self {
            PasswordIssue::TooShort => format!("Password must have at least {MIN_LEN} characters"),
            PasswordIssue::TooLong => format!("Password must not exceed {MAX_BYTES} bytes"),
            PasswordIssue::MissingLowercase => "Password needs a lower case letter".to_string(),
            PasswordIssue::MissingUppercase => "Password needs an upper case letter".to_string(),
            PasswordIssue::MissingDigit => "Password needs a digit".to_string(),
        }
    }
}

pub fn password_issue(password: &str) -> Option<PasswordIssue> {
    if password.chars().count() < MIN_LEN {
        return Some(PasswordIssue::TooShort);
    }
    if password.len() > MAX_BYTES {
        return Some(PasswordIssue::TooLong);
    }
    if !password.chars().any(char::is_lowercase) {
        return Some(PasswordIssue::MissingLowercase);
    }
    if !password.chars().any(char::is_uppercase) {
        return Some(PasswordIssue::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some(PasswordIssue::MissingDigit);
    }
    None
}

pub fn validate_password(password: &str) -> AppResult<()> {
    match password_issue(password) {
        Some(issue) => Err(AppError::ValidationError(issue.message())),
        None => Ok(()),
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}

/// A stored hash that bcrypt cannot parse counts as an internal error, not a
/// wrong password.
pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    verify(password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert_eq!(password_issue("Vendedor2024"), None);
        assert_eq!(password_issue("Ab1"), Some(PasswordIssue::TooShort));
        assert_eq!(
            password_issue("vendedor2024"),
            Some(PasswordIssue::MissingUppercase)
        );
        assert_eq!(
            password_issue("VENDEDOR2024"),
            Some(PasswordIssue::MissingLowercase)
        );
        assert_eq!(password_issue("Vendedores"), Some(PasswordIssue::MissingDigit));
        let long = format!("Aa1{}", "x".repeat(70));
        assert_eq!(password_issue(&long), Some(PasswordIssue::TooLong));
        assert!(matches!(
            validate_password("corto"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_hash_round_trip() {
        let hashed = hash_password("Admin12345").unwrap();
        assert_ne!(hashed, "Admin12345");
        assert!(verify_password("Admin12345", &hashed).unwrap());
        assert!(!verify_password("admin12345", &hashed).unwrap());
        assert!(verify_password("Admin12345", "not-a-bcrypt-hash").is_err());
    }
}
