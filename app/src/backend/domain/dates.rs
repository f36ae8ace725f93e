//! Date handling for bank statement exports.
//!
//! Quicken's legacy interchange dialect writes dates as `M/D'YYYY`: month
//! and day without padding, an apostrophe, then the full year.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::errors::ExportError;

/// Hour every statement date is pinned to, so that midnight never rolls
/// the calendar date across a timezone or DST boundary.
pub const STATEMENT_HOUR: u32 = 10;

/// Parse an upstream date string into a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps and `M/D/YYYY`. Timestamps keep the calendar date exactly as
/// written; the local timezone never shifts it.
pub fn parse_date(date: &str) -> Result<NaiveDate, ExportError> {
    let trimmed = date.trim();

    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_local().date());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed.date());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Ok(parsed);
    }

    Err(ExportError::InvalidDate(date.to_string()))
}

/// Format a date string the way bank statements expect it (`3/5'2023`)
pub fn simple_date(date: &str) -> Result<String, ExportError> {
    let parsed = parse_date(date)?
        .and_hms_opt(STATEMENT_HOUR, 0, 0)
        .ok_or_else(|| ExportError::InvalidDate(date.to_string()))?;

    Ok(format!("{}/{}'{}", parsed.month(), parsed.day(), parsed.year()))
}
