//! Field validation shared by registration and the admin user forms.
//!
//! Failures carry field-level messages and never change state.

use crate::error::DomainError;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 8;

fn length_in_range(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if !length_in_range(name, NAME_MIN, NAME_MAX) {
        return Err(DomainError::Validation(format!(
            "name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    Ok(())
}

pub fn validate_nickname(nickname: &str) -> Result<(), DomainError> {
    if !length_in_range(nickname, NAME_MIN, NAME_MAX) {
        return Err(DomainError::Validation(format!(
            "nickname must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid || email.contains(char::is_whitespace) {
        return Err(DomainError::Validation(
            "email address is not valid".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(DomainError::Validation(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

pub fn validate_password_confirmation(
    password: &str,
    confirm_password: &str,
) -> Result<(), DomainError> {
    if password != confirm_password {
        return Err(DomainError::Validation(
            "passwords do not match".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_post_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation(
            "post content must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_bounds() {
        assert!(validate_name("al").is_ok());
        assert!(validate_name("a").is_err());
        assert!(validate_name(&"x".repeat(20)).is_ok());
        assert!(validate_name(&"x".repeat(21)).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@nodot").is_err());
        assert!(validate_email("a lice@example.com").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password_confirmation("abc12345", "abc12345").is_ok());
        assert!(validate_password_confirmation("abc12345", "abc12346").is_err());
    }

    #[test]
    fn test_post_content_not_blank() {
        assert!(validate_post_content("hello").is_ok());
        assert!(validate_post_content("   ").is_err());
    }
}
