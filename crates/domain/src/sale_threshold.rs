// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Signed, calendar-relative date offsets.
//!
//! Sale thresholds are configured as relative date expressions such as
//! `-3 weeks` or `-12 hours`. An expression is a sequence of terms, each a
//! signed integer followed by a unit:
//!
//! ```text
//! -3 weeks
//! -12 hours
//! -1 month +2 days
//! +1 fortnight
//! ```
//!
//! ## Invariants
//!
//! - Expressions are parsed once, at configuration load. A malformed
//!   expression is a configuration error and never surfaces per call.
//! - Months and years are calendar steps, not fixed durations. `-1 month`
//!   and `-30 days` differ.
//! - A day-of-month that does not exist in the target month rolls forward
//!   into the following month (`2024-03-31 -1 month` is `2024-03-02`).
//! - Calendar steps keep the wall-clock time. `apply_in` keeps it in a
//!   named timezone, so `-3 weeks` across a DST change still lands on the
//!   same local hour. A local time skipped by DST moves forward by an hour.

use crate::error::DomainError;
use crate::local_time::{resolve_local_datetime, to_local_datetime};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime};

/// A parsed relative date offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeOffset {
    /// Calendar months (years are folded in as 12 months).
    months: i64,
    /// Calendar days (weeks are folded in as 7 days).
    days: i64,
    /// Exact seconds (hours and minutes are folded in).
    seconds: i64,
    /// The expression as configured.
    source: String,
}

/// The unit of a single offset term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Fortnight,
    Month,
    Year,
}

impl OffsetUnit {
    fn parse(unit: &str) -> Option<Self> {
        let unit: String = unit.to_ascii_lowercase();
        let unit: &str = unit.strip_suffix('s').unwrap_or(&unit);
        match unit {
            "sec" | "second" => Some(Self::Second),
            "min" | "minute" => Some(Self::Minute),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "fortnight" => Some(Self::Fortnight),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

impl RelativeOffset {
    pub(crate) fn from_days(days: i64, source: &str) -> Self {
        Self {
            months: 0,
            days,
            seconds: 0,
            source: source.to_string(),
        }
    }

    pub(crate) fn from_seconds(seconds: i64, source: &str) -> Self {
        Self {
            months: 0,
            days: 0,
            seconds,
            source: source.to_string(),
        }
    }

    /// Returns the offset as configured.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.source
    }

    /// Returns whether the offset moves an instant at all.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.months == 0 && self.days == 0 && self.seconds == 0
    }

    /// Applies the offset to an instant.
    ///
    /// Months are applied first, then days, then the exact seconds.
    ///
    /// Returns `None` if the result falls outside the representable range.
    #[must_use]
    pub fn apply(&self, instant: OffsetDateTime) -> Option<OffsetDateTime> {
        let date: Date = add_months(instant.date(), self.months)?;
        let date: Date = date.checked_add(Duration::days(self.days))?;
        instant
            .replace_date(date)
            .checked_add(Duration::seconds(self.seconds))
    }

    /// Applies the offset to an instant, stepping the calendar in `timezone`.
    ///
    /// Months and days move the local wall-clock date; the exact seconds are
    /// added to the resulting instant.
    ///
    /// Returns `None` if the result falls outside the representable range.
    #[must_use]
    pub fn apply_in(&self, instant: OffsetDateTime, timezone: &Tz) -> Option<OffsetDateTime> {
        let shifted: OffsetDateTime = if self.months == 0 && self.days == 0 {
            instant
        } else {
            let local: PrimitiveDateTime = to_local_datetime(instant, timezone).ok()?;
            let date: Date = add_months(local.date(), self.months)?;
            let date: Date = date.checked_add(Duration::days(self.days))?;
            resolve_wall_clock(local.replace_date(date), timezone)?
                .checked_add(Duration::nanoseconds(i64::from(instant.nanosecond())))?
        };
        shifted.checked_add(Duration::seconds(self.seconds))
    }

    fn invalid(expression: &str, reason: &str) -> DomainError {
        DomainError::InvalidRelativeOffset {
            expression: expression.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Folds one parsed term into the running totals.
    fn push_term(&mut self, value: i64, unit: OffsetUnit) -> Option<()> {
        match unit {
            OffsetUnit::Second => self.seconds = self.seconds.checked_add(value)?,
            OffsetUnit::Minute => self.seconds = self.seconds.checked_add(value.checked_mul(60)?)?,
            OffsetUnit::Hour => self.seconds = self.seconds.checked_add(value.checked_mul(3600)?)?,
            OffsetUnit::Day => self.days = self.days.checked_add(value)?,
            OffsetUnit::Week => self.days = self.days.checked_add(value.checked_mul(7)?)?,
            OffsetUnit::Fortnight => self.days = self.days.checked_add(value.checked_mul(14)?)?,
            OffsetUnit::Month => self.months = self.months.checked_add(value)?,
            OffsetUnit::Year => self.months = self.months.checked_add(value.checked_mul(12)?)?,
        }
        Some(())
    }
}

impl FromStr for RelativeOffset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut offset: Self = Self {
            months: 0,
            days: 0,
            seconds: 0,
            source: s.trim().to_string(),
        };

        let mut chars = s.chars().peekable();
        let mut terms: usize = 0;

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.peek().is_none() {
                break;
            }

            let negative: bool = match chars.next_if(|c| *c == '+' || *c == '-') {
                Some(sign) => sign == '-',
                None => false,
            };
            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            let mut digits: String = String::new();
            while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                digits.push(digit);
            }
            if digits.is_empty() {
                return Err(Self::invalid(s, "expected a number"));
            }
            let magnitude: i64 = digits
                .parse()
                .map_err(|_| Self::invalid(s, "number out of range"))?;
            let value: i64 = if negative { -magnitude } else { magnitude };

            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            let mut unit: String = String::new();
            while let Some(letter) = chars.next_if(char::is_ascii_alphabetic) {
                unit.push(letter);
            }
            if unit.is_empty() {
                return Err(Self::invalid(s, "expected a unit after the number"));
            }
            let unit: OffsetUnit = OffsetUnit::parse(&unit)
                .ok_or_else(|| Self::invalid(s, &format!("unknown unit '{unit}'")))?;

            offset
                .push_term(value, unit)
                .ok_or_else(|| Self::invalid(s, "offset out of range"))?;
            terms += 1;
        }

        if terms == 0 {
            return Err(Self::invalid(s, "expression is empty"));
        }

        Ok(offset)
    }
}

impl std::fmt::Display for RelativeOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl Serialize for RelativeOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for RelativeOffset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let expression: String = String::deserialize(deserializer)?;
        expression.parse().map_err(serde::de::Error::custom)
    }
}

/// Resolves a wall-clock time, moving a time skipped by DST one hour forward.
fn resolve_wall_clock(local: PrimitiveDateTime, timezone: &Tz) -> Option<OffsetDateTime> {
    match resolve_local_datetime(local, timezone) {
        Ok(instant) => Some(instant),
        Err(DomainError::NonExistentLocalTime { .. }) => {
            resolve_local_datetime(local.checked_add(Duration::hours(1))?, timezone).ok()
        }
        Err(_) => None,
    }
}

/// Moves a date by whole calendar months, rolling an overflowing day forward.
fn add_months(date: Date, months: i64) -> Option<Date> {
    if months == 0 {
        return Some(date);
    }

    let month_index: i64 = i64::from(date.year())
        .checked_mul(12)?
        .checked_add(i64::from(u8::from(date.month())) - 1)?
        .checked_add(months)?;

    let year: i32 = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month: Month = Month::try_from(u8::try_from(month_index.rem_euclid(12) + 1).ok()?).ok()?;

    Date::from_calendar_date(year, month, 1)
        .ok()?
        .checked_add(Duration::days(i64::from(date.day()) - 1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn offset(expression: &str) -> RelativeOffset {
        expression.parse().unwrap()
    }

    #[test]
    fn test_parse_default_thresholds() {
        let start: RelativeOffset = offset("-3 weeks");
        assert_eq!(start.days, -21);
        assert_eq!(start.months, 0);
        assert_eq!(start.seconds, 0);

        let end: RelativeOffset = offset("-12 hours");
        assert_eq!(end.seconds, -12 * 3600);
        assert_eq!(end.days, 0);
    }

    #[test]
    fn test_parse_singular_and_attached_forms() {
        assert_eq!(offset("-3 week").days, -21);
        assert_eq!(offset("-3week").days, -21);
        assert_eq!(offset("- 3 WEEKS").days, -21);
        assert_eq!(offset("2 days").days, 2);
        assert_eq!(offset("+1 fortnight").days, 14);
        assert_eq!(offset("90 min").seconds, 5400);
        assert_eq!(offset("-1 year").months, -12);
    }

    #[test]
    fn test_parse_compound_expression() {
        let compound: RelativeOffset = offset("-1 week +2 days -6 hours");
        assert_eq!(compound.days, -5);
        assert_eq!(compound.seconds, -6 * 3600);
    }

    #[test]
    fn test_parse_rejects_malformed_expressions() {
        for expression in ["", "   ", "three weeks", "-3", "-3 lightyears", "weeks", "--3 days"] {
            let result: Result<RelativeOffset, DomainError> = expression.parse();
            assert!(
                matches!(result, Err(DomainError::InvalidRelativeOffset { .. })),
                "expected '{expression}' to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflowing_number() {
        let result: Result<RelativeOffset, DomainError> = "99999999999999999999 days".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_display_keeps_expression() {
        assert_eq!(offset("  -3 weeks ").to_string(), "-3 weeks");
    }

    #[test]
    fn test_apply_weeks_and_hours() {
        let event_start = datetime!(2024-06-01 19:00 UTC);
        assert_eq!(
            offset("-3 weeks").apply(event_start),
            Some(datetime!(2024-05-11 19:00 UTC))
        );
        assert_eq!(
            offset("-12 hours").apply(event_start),
            Some(datetime!(2024-06-01 07:00 UTC))
        );
    }

    #[test]
    fn test_month_differs_from_thirty_days() {
        let instant = datetime!(2024-03-31 10:00 UTC);
        // February 31st does not exist and rolls forward into March.
        assert_eq!(
            offset("-1 month").apply(instant),
            Some(datetime!(2024-03-02 10:00 UTC))
        );
        assert_eq!(
            offset("-30 days").apply(instant),
            Some(datetime!(2024-03-01 10:00 UTC))
        );
    }

    #[test]
    fn test_apply_crosses_year_boundary() {
        assert_eq!(
            offset("-2 months").apply(datetime!(2024-01-15 12:00 UTC)),
            Some(datetime!(2023-11-15 12:00 UTC))
        );
        assert_eq!(
            offset("+1 year").apply(datetime!(2024-02-29 00:00 UTC)),
            Some(datetime!(2025-03-01 00:00 UTC))
        );
    }

    #[test]
    fn test_apply_keeps_offset() {
        let instant = datetime!(2024-06-01 19:00 +02:00);
        let shifted = offset("-1 day").apply(instant).unwrap();
        assert_eq!(shifted, datetime!(2024-05-31 19:00 +02:00));
        assert_eq!(shifted.offset(), instant.offset());
    }

    #[test]
    fn test_apply_in_keeps_local_hour_across_dst() {
        let tz: Tz = "Europe/Amsterdam".parse().unwrap();
        // 2024-11-10 19:00 CET, three weeks later than 2024-10-20 19:00 CEST
        let event_start = datetime!(2024-11-10 18:00 UTC);
        assert_eq!(
            offset("-3 weeks").apply_in(event_start, &tz),
            Some(datetime!(2024-10-20 17:00 UTC))
        );
        // Exact units ignore the DST change
        assert_eq!(
            offset("-12 hours").apply_in(datetime!(2024-10-27 09:00 UTC), &tz),
            Some(datetime!(2024-10-26 21:00 UTC))
        );
    }

    #[test]
    fn test_apply_in_skipped_local_time_moves_forward() {
        let tz: Tz = "Europe/Amsterdam".parse().unwrap();
        // 2024-04-07 02:30 CEST minus one week is 2024-03-31 02:30, which
        // does not exist; it becomes 03:30 CEST
        assert_eq!(
            offset("-1 week").apply_in(datetime!(2024-04-07 00:30 UTC), &tz),
            Some(datetime!(2024-03-31 01:30 UTC))
        );
    }

    #[test]
    fn test_apply_in_utc_matches_apply() {
        let instant = datetime!(2024-03-31 10:00:00.5 UTC);
        for expression in ["-1 month", "-3 weeks", "-12 hours", "-1 year +2 days -90 min"] {
            assert_eq!(
                offset(expression).apply_in(instant, &Tz::UTC),
                offset(expression).apply(instant),
                "{expression}"
            );
        }
    }

    #[test]
    fn test_apply_overflow_returns_none() {
        assert_eq!(offset("+20000 years").apply(datetime!(2024-01-01 00:00 UTC)), None);
    }

    #[test]
    fn test_serde_round_trips_through_expression() {
        let parsed: RelativeOffset = serde_json::from_str("\"-12 hours\"").unwrap();
        assert_eq!(parsed, offset("-12 hours"));
        assert!(serde_json::from_str::<RelativeOffset>("\"soon\"").is_err());
    }
}
