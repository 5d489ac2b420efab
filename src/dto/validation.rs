//! Validation helpers for DTOs.

use time::{Date, Time, format_description::BorrowedFormatItem, macros::format_description};
use validator::{ValidateUrl, ValidationError};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// Validates a calendar date written as `YYYY-MM-DD`.
///
/// The fixed width keeps lexical and chronological order identical.
///
/// ```ignore
/// validate_match_date("2026-06-14") // Ok
/// validate_match_date("2026-6-14")  // Err - not zero padded
/// validate_match_date("2026-02-30") // Err - no such day
/// ```
pub fn validate_match_date(value: &str) -> Result<(), ValidationError> {
    if value.len() != 10 || Date::parse(value, DATE_FORMAT).is_err() {
        let mut err = ValidationError::new("match_date_format");
        err.message = Some(format!("date must be a valid `YYYY-MM-DD` day (got `{value}`)").into());
        return Err(err);
    }
    Ok(())
}

/// Validates a kick-off time written as `HH:MM` on a 24 hour clock.
pub fn validate_match_time(value: &str) -> Result<(), ValidationError> {
    if value.len() != 5 || Time::parse(value, TIME_FORMAT).is_err() {
        let mut err = ValidationError::new("match_time_format");
        err.message = Some(format!("time must be `HH:MM` (got `{value}`)").into());
        return Err(err);
    }
    Ok(())
}

/// Rejects empty or whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Every scorer entry must name a player.
pub fn validate_scorers(scorers: &[String]) -> Result<(), ValidationError> {
    if scorers.iter().any(|name| name.trim().is_empty()) {
        let mut err = ValidationError::new("blank_scorer");
        err.message = Some("scorer names must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Image links must be absolute URLs.
pub fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    if !value.validate_url() {
        let mut err = ValidationError::new("url");
        err.message = Some(format!("`{value}` is not a valid URL").into());
        return Err(err);
    }
    Ok(())
}
