//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: customer, hall, vendor, package, billing item, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, IC number, reference, category, unit
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Upper bound for any single money amount
pub const MAX_AMOUNT: f64 = 100_000_000.0;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::field(field, format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::field(
            field,
            format!("{field} is too long (max {max_len} chars)"),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::field(
            field,
            format!("{field} is too long (max {max_len} chars)"),
        ));
    }
    Ok(())
}

/// Value a nullable update field writes: `None` when absent or cleared
pub fn nullable_value(field: &Option<Option<String>>) -> Option<String> {
    field.clone().flatten()
}

/// Text a partial update writes: the sent value (possibly `null`) when the
/// field is present, the stored value otherwise
pub fn patched_text<'a>(
    field: &'a Option<Option<String>>,
    stored: &'a Option<String>,
) -> Option<&'a str> {
    match field {
        Some(value) => value.as_deref(),
        None => stored.as_deref(),
    }
}

/// Loose email shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_EMAIL_LEN)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::field(field, format!("{field} is not a valid email")));
    }
    Ok(())
}

pub fn validate_optional_email(value: &Option<String>, field: &str) -> Result<(), AppError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => validate_email(v, field),
        _ => Ok(()),
    }
}

pub fn validate_password(value: &str) -> Result<(), AppError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort).with_detail("field", "password"));
    }
    if value.len() > MAX_PASSWORD_LEN {
        return Err(AppError::field(
            "password",
            format!("password is too long (max {MAX_PASSWORD_LEN} chars)"),
        ));
    }
    Ok(())
}

/// Finite, non-negative, bounded money value
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 || value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be between 0 and {MAX_AMOUNT}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_positive_quantity(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value <= 0.0 || value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be greater than 0"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Main Hall", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = validate_required_text(&long, "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".into()), "notes", 5).is_ok());
        assert!(validate_optional_text(&Some("too long".into()), "notes", 5).is_err());
    }

    #[test]
    fn test_patched_text() {
        let stored = Some("old".to_string());
        assert_eq!(patched_text(&None, &stored), Some("old"));
        assert_eq!(patched_text(&Some(None), &stored), None);
        assert_eq!(patched_text(&Some(Some("new".into())), &stored), Some("new"));
    }

    #[test]
    fn test_nullable_value() {
        assert_eq!(nullable_value(&None), None);
        assert_eq!(nullable_value(&Some(None)), None);
        assert_eq!(nullable_value(&Some(Some("x".into()))), Some("x".to_string()));
    }

    #[test]
    fn test_email() {
        assert!(validate_email("admin@temple.local", "email").is_ok());
        assert!(validate_email("no-at-sign", "email").is_err());
        assert!(validate_email("a@b", "email").is_err());
        assert!(validate_email("@temple.local", "email").is_err());
        assert!(validate_optional_email(&Some(String::new()), "email").is_ok());
    }

    #[test]
    fn test_password_and_amount() {
        assert_eq!(
            validate_password("short").unwrap_err().code,
            ErrorCode::PasswordTooShort
        );
        assert!(validate_password("long-enough").is_ok());

        assert!(validate_amount(0.0, "unit_price").is_ok());
        assert!(validate_amount(-1.0, "unit_price").is_err());
        assert!(validate_amount(f64::NAN, "unit_price").is_err());
        assert!(validate_positive_quantity(0.0, "quantity").is_err());
        assert!(validate_positive_quantity(1.5, "quantity").is_ok());
    }
}
