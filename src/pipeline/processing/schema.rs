//! Field rules for a single lead.
//!
//! Every field is required and checked independently: a record that breaks
//! several rules reports all of them, one reason per field.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::constants::{
    ADDRESS_FIELD, ADDRESS_MAX_LEN, ADDRESS_MIN_LEN, EMAIL_FIELD, ENTRY_DATE_FIELD,
    FIRST_NAME_FIELD, ID_FIELD, ID_MAX_LEN, LAST_NAME_FIELD, NAME_MAX_LEN,
};
use crate::domain::{Lead, RawLead};

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name pattern is valid"));

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email pattern is valid")
});

const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

pub const REASON_REQUIRED: &str = "field required";
pub const REASON_NOT_STRING: &str = "must be a string";
pub const REASON_INVALID_EMAIL: &str = "value is not a valid email address";
pub const REASON_NAME_PATTERN: &str = "must contain only letters and spaces";
pub const REASON_ADDRESS_TOO_SHORT: &str = "must be at least 5 characters";
pub const REASON_ADDRESS_TOO_LONG: &str = "must be at most 200 characters";
pub const REASON_MISSING_TIMEZONE: &str = "must include timezone information";
pub const REASON_DATE_FORMAT: &str = "must match format YYYY-MM-DDTHH:MM:SS+00:00";

/// One violated field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Either the normalized lead or every field error found, in field order
pub type ValidationOutcome = Result<Lead, Vec<FieldError>>;

/// Apply every field rule to a raw lead.
///
/// Fields not named by the schema are ignored and do not reach the normalized lead.
pub fn validate_lead(raw: &RawLead) -> ValidationOutcome {
    let mut errors = Vec::new();

    let id = check_field(raw, ID_FIELD, validate_id, &mut errors);
    let email = check_field(raw, EMAIL_FIELD, validate_email, &mut errors);
    let first_name = check_field(raw, FIRST_NAME_FIELD, validate_name, &mut errors);
    let last_name = check_field(raw, LAST_NAME_FIELD, validate_name, &mut errors);
    let address = check_field(raw, ADDRESS_FIELD, validate_address, &mut errors);
    let entry_date = check_field(raw, ENTRY_DATE_FIELD, parse_entry_date, &mut errors);

    match (id, email, first_name, last_name, address, entry_date) {
        (
            Some(id),
            Some(email),
            Some(first_name),
            Some(last_name),
            Some(address),
            Some(entry_date),
        ) => Ok(Lead {
            id,
            email,
            first_name,
            last_name,
            address,
            entry_date,
        }),
        _ => Err(errors),
    }
}

fn check_field<T>(
    raw: &RawLead,
    field: &str,
    rule: fn(&str) -> Result<T, String>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let result = match raw.get(field) {
        None => Err(REASON_REQUIRED.to_string()),
        Some(Value::String(value)) => rule(value),
        Some(_) => Err(REASON_NOT_STRING.to_string()),
    };

    match result {
        Ok(value) => Some(value),
        Err(reason) => {
            errors.push(FieldError::new(field, reason));
            None
        }
    }
}

fn length_reason(max: usize) -> String {
    format!("must be between 1 and {} characters", max)
}

fn validate_id(value: &str) -> Result<String, String> {
    let len = value.chars().count();
    if len == 0 || len > ID_MAX_LEN {
        return Err(length_reason(ID_MAX_LEN));
    }
    Ok(value.to_string())
}

fn validate_email(value: &str) -> Result<String, String> {
    if is_valid_email(value) {
        Ok(value.to_string())
    } else {
        Err(REASON_INVALID_EMAIL.to_string())
    }
}

fn validate_name(value: &str) -> Result<String, String> {
    let len = value.chars().count();
    if len == 0 || len > NAME_MAX_LEN {
        return Err(length_reason(NAME_MAX_LEN));
    }
    if !NAME_PATTERN.is_match(value) {
        return Err(REASON_NAME_PATTERN.to_string());
    }
    Ok(title_case(value))
}

fn validate_address(value: &str) -> Result<String, String> {
    if value.chars().count() > ADDRESS_MAX_LEN {
        return Err(REASON_ADDRESS_TOO_LONG.to_string());
    }
    let trimmed = value.trim();
    if trimmed.chars().count() < ADDRESS_MIN_LEN {
        return Err(REASON_ADDRESS_TOO_SHORT.to_string());
    }
    Ok(trimmed.to_string())
}

/// Syntactic email check: dot-atom local part, dotted domain ending in an alphabetic TLD.
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > EMAIL_MAX_LEN {
        return false;
    }
    match value.split_once('@') {
        Some((local, _)) if local.len() <= EMAIL_LOCAL_MAX_LEN => EMAIL_PATTERN.is_match(value),
        _ => false,
    }
}

/// Upper-case the first letter of every run of letters and lower-case the rest.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Parse an ISO-8601 timestamp that carries an explicit UTC offset.
///
/// Naive timestamps are rejected as missing a timezone. Anything that does not
/// render back exactly as `YYYY-MM-DDTHH:MM:SS±HH:MM` (fractional or leap
/// seconds included) is rejected as malformed.
pub fn parse_entry_date(value: &str) -> Result<DateTime<FixedOffset>, String> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) if parsed.nanosecond() == 0 => Ok(parsed),
        Ok(_) => Err(REASON_DATE_FORMAT.to_string()),
        Err(_) if is_naive_timestamp(value) => Err(REASON_MISSING_TIMEZONE.to_string()),
        Err(_) => Err(REASON_DATE_FORMAT.to_string()),
    }
}

fn is_naive_timestamp(value: &str) -> bool {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
