//! Input normalization and validation primitives.
//!
//! Every function is pure: the same input always gives the same normalized
//! value or the same [`DomainError::Validation`] message.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::DomainError;
use crate::patch::Patch;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 72;

pub const NAME_LIMITS: TextLimits = TextLimits::between(2, 80);
pub const CATEGORY_NAME_LIMITS: TextLimits = TextLimits::between(2, 50);
pub const TRANSACTION_TITLE_LIMITS: TextLimits = TextLimits::between(2, 100);

/// Length bounds for required text, counted in characters after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLimits {
    pub min: usize,
    pub max: Option<usize>,
}

impl TextLimits {
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }
}

impl Default for TextLimits {
    fn default() -> Self {
        Self::at_least(1)
    }
}

fn invalid(msg: impl Into<String>) -> DomainError {
    DomainError::Validation(msg.into())
}

/// Trims `value` and checks its length against `limits`.
pub fn required_text(value: &str, field: &str, limits: TextLimits) -> Result<String, DomainError> {
    let normalized = value.trim();
    let len = normalized.chars().count();

    if len < limits.min {
        return Err(invalid(format!(
            "{} must contain at least {} character(s).",
            field, limits.min
        )));
    }

    if let Some(max) = limits.max {
        if len > max {
            return Err(invalid(format!(
                "{} must contain at most {} character(s).",
                field, max
            )));
        }
    }

    Ok(normalized.to_string())
}

/// Trims an optional free-text field; blank text becomes `Null`.
pub fn optional_text(value: Patch<String>) -> Patch<String> {
    match value {
        Patch::Value(text) => {
            let normalized = text.trim();
            if normalized.is_empty() {
                Patch::Null
            } else {
                Patch::Value(normalized.to_string())
            }
        }
        other => other,
    }
}

/// Trims and lowercases an email, then checks the `local@domain.tld` shape.
pub fn email(value: &str) -> Result<String, DomainError> {
    let normalized = value.trim().to_lowercase();

    if is_email_shaped(&normalized) {
        Ok(normalized)
    } else {
        Err(invalid("Email is invalid."))
    }
}

fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Some dot must have at least one character on each side.
    let chars: Vec<char> = domain.chars().collect();
    chars.len() >= 3 && chars[1..chars.len() - 1].contains(&'.')
}

/// Checks password length; the password itself is returned untouched.
pub fn password(value: &str) -> Result<&str, DomainError> {
    let len = value.chars().count();

    if len < MIN_PASSWORD_LENGTH {
        return Err(invalid(format!(
            "Password must contain at least {} character(s).",
            MIN_PASSWORD_LENGTH
        )));
    }

    if len > MAX_PASSWORD_LENGTH {
        return Err(invalid(format!(
            "Password must contain at most {} character(s).",
            MAX_PASSWORD_LENGTH
        )));
    }

    Ok(value)
}

/// Amount must be finite and strictly positive.
pub fn amount(value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid("Amount must be a number greater than zero."))
    }
}

/// Parses an instant from RFC 3339, a naive datetime (UTC), or a plain date
/// (UTC midnight).
pub fn date(value: &str) -> Result<DateTime<Utc>, DomainError> {
    let raw = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(invalid("Date is invalid."))
}

/// Validates a record id supplied by a client.
///
/// Blank ids are rejected. A non-blank id that does not parse cannot match any
/// stored record, so it yields `Ok(None)` and the caller reports "not found".
pub fn record_id<T: std::str::FromStr>(value: &str, field: &str) -> Result<Option<T>, DomainError> {
    let normalized = required_text(value, field, TextLimits::default())?;
    Ok(normalized.parse().ok())
}
