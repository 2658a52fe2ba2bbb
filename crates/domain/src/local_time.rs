// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wall-clock datetime handling.
//!
//! Catalog dates are stored as naive wall-clock strings
//! (`YYYY-MM-DD HH:MM:SS`) in the site's declared timezone. This module
//! converts them to and from instants.
//!
//! ## Invariants
//!
//! - Ambiguous wall-clock times (DST fall-back) resolve to the earlier instant
//! - Non-existent wall-clock times (DST spring-forward) are rejected

use crate::error::DomainError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// Parses an IANA timezone identifier.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the identifier is unknown.
pub fn parse_timezone(timezone: &str) -> Result<Tz, DomainError> {
    timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))
}

/// Parses a stored wall-clock datetime.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD HH:MM`.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string matches neither format.
pub fn parse_stored_datetime(value: &str) -> Result<PrimitiveDateTime, DomainError> {
    let with_seconds = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let without_seconds = format_description!("[year]-[month]-[day] [hour]:[minute]");

    PrimitiveDateTime::parse(value.trim(), with_seconds)
        .or_else(|_| PrimitiveDateTime::parse(value.trim(), without_seconds))
        .map_err(|e| DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        })
}

/// Formats a wall-clock datetime for storage.
#[must_use]
pub fn format_stored_datetime(value: PrimitiveDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        value.year(),
        u8::from(value.month()),
        value.day(),
        value.hour(),
        value.minute(),
        value.second()
    )
}

/// Resolves a wall-clock datetime in a timezone to an instant.
///
/// # Errors
///
/// Returns an error if the wall-clock time does not exist in the timezone
/// or cannot be represented.
pub fn resolve_local_datetime(
    value: PrimitiveDateTime,
    timezone: &Tz,
) -> Result<OffsetDateTime, DomainError> {
    // Convert time::PrimitiveDateTime to chrono::NaiveDateTime
    let date = NaiveDate::from_ymd_opt(
        value.year(),
        u32::from(u8::from(value.month())),
        u32::from(value.day()),
    )
    .ok_or_else(|| DomainError::DateParseError {
        date_string: format_stored_datetime(value),
        error: String::from("date out of range"),
    })?;
    let time = NaiveTime::from_hms_opt(
        u32::from(value.hour()),
        u32::from(value.minute()),
        u32::from(value.second()),
    )
    .ok_or_else(|| DomainError::DateParseError {
        date_string: format_stored_datetime(value),
        error: String::from("time out of range"),
    })?;

    let local = timezone
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| DomainError::NonExistentLocalTime {
            datetime: format_stored_datetime(value),
            timezone: timezone.name().to_string(),
        })?;

    OffsetDateTime::from_unix_timestamp(local.timestamp()).map_err(|e| {
        DomainError::DateParseError {
            date_string: format_stored_datetime(value),
            error: e.to_string(),
        }
    })
}

/// Converts an instant to wall-clock time in a timezone.
///
/// Sub-second precision is dropped; storage keeps whole seconds.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the instant cannot be represented
/// as a wall-clock time.
pub fn to_local_datetime(
    instant: OffsetDateTime,
    timezone: &Tz,
) -> Result<PrimitiveDateTime, DomainError> {
    let out_of_range = |reason: &str| DomainError::DateParseError {
        date_string: instant.to_string(),
        error: reason.to_string(),
    };

    let local = DateTime::from_timestamp(instant.unix_timestamp(), 0)
        .ok_or_else(|| out_of_range("instant out of range"))?
        .with_timezone(timezone)
        .naive_local();

    let month: Month = u8::try_from(local.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| out_of_range("month out of range"))?;
    let day: u8 = u8::try_from(local.day()).map_err(|_| out_of_range("day out of range"))?;
    let date: Date = Date::from_calendar_date(local.year(), month, day)
        .map_err(|e| out_of_range(&e.to_string()))?;

    let hour: u8 = u8::try_from(local.hour()).map_err(|_| out_of_range("hour out of range"))?;
    let minute: u8 =
        u8::try_from(local.minute()).map_err(|_| out_of_range("minute out of range"))?;
    let second: u8 =
        u8::try_from(local.second()).map_err(|_| out_of_range("second out of range"))?;
    let time: Time =
        Time::from_hms(hour, minute, second).map_err(|e| out_of_range(&e.to_string()))?;

    Ok(PrimitiveDateTime::new(date, time))
}
