// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sale window resolution for buyables.
//!
//! This module resolves the effective sale window of a buyable from:
//! - The buyable's explicit `available_from` / `available_till`
//! - The owning event's start date
//! - The configured sale start and end thresholds
//!
//! ## Invariants
//!
//! - Explicit dates always win over derived ones
//! - A bound with neither an explicit date nor an event start is absent
//! - Absent bounds close the window (fail-closed); they never mean "always"
//! - Both bounds are inclusive
//! - Derived bounds step the calendar in the configured timezone
//!
//! ## Example
//!
//! ```text
//! sale_start = -3 weeks
//! sale_end   = -12 hours
//! event start = 2024-06-01 19:00
//!
//! window = [2024-05-11 19:00, 2024-06-01 07:00]
//! ```

use crate::error::DomainError;
use crate::sale_threshold::RelativeOffset;
use crate::types::{Buyable, Event};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

/// Default offset from the event start at which sales open.
pub const DEFAULT_SALE_START_THRESHOLD: &str = "-3 weeks";

/// Default offset from the event start at which sales close.
pub const DEFAULT_SALE_END_THRESHOLD: &str = "-12 hours";

/// The configured offsets used to derive a sale window from an event start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleThresholds {
    /// Offset from the event start at which sales open.
    pub sale_start: RelativeOffset,
    /// Offset from the event start at which sales close.
    pub sale_end: RelativeOffset,
    /// Timezone whose wall clock the calendar offsets move.
    #[serde(skip, default = "utc")]
    pub timezone: Tz,
}

const fn utc() -> Tz {
    Tz::UTC
}

impl SaleThresholds {
    /// Parses a pair of threshold expressions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRelativeOffset` if either expression is malformed.
    pub fn parse(sale_start: &str, sale_end: &str) -> Result<Self, DomainError> {
        Ok(Self {
            sale_start: sale_start.parse()?,
            sale_end: sale_end.parse()?,
            timezone: Tz::UTC,
        })
    }

    /// Returns the thresholds with calendar steps taken in `timezone`.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}

impl Default for SaleThresholds {
    fn default() -> Self {
        Self {
            sale_start: RelativeOffset::from_days(-21, DEFAULT_SALE_START_THRESHOLD),
            sale_end: RelativeOffset::from_seconds(-12 * 3600, DEFAULT_SALE_END_THRESHOLD),
            timezone: Tz::UTC,
        }
    }
}

/// The effective sale window of a buyable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleWindow {
    /// When sales open, if resolvable.
    #[serde(with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    /// When sales close, if resolvable.
    #[serde(with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

impl SaleWindow {
    /// Returns whether at least one bound is known.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Returns whether `now` lies inside the window.
    ///
    /// Both bounds must be known. `start <= now <= end`.
    #[must_use]
    pub fn contains(&self, now: OffsetDateTime) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= now && now <= end,
            _ => false,
        }
    }
}

/// Resolves the sale window of a buyable.
///
/// # Arguments
///
/// * `buyable` - The buyable whose window is resolved
/// * `event` - The owning event, if it could be loaded
/// * `thresholds` - The sale start and end offsets
///
/// # Returns
///
/// A `SaleWindow` whose bounds are `None` when neither an explicit date nor
/// an event start date is available.
#[must_use]
pub fn resolve_sale_window(
    buyable: &Buyable,
    event: Option<&Event>,
    thresholds: &SaleThresholds,
) -> SaleWindow {
    let event_start: Option<OffsetDateTime> = event.and_then(|e| e.start_date);

    SaleWindow {
        start: buyable.available_from.or_else(|| {
            derive_bound(
                buyable,
                event_start,
                &thresholds.sale_start,
                &thresholds.timezone,
            )
        }),
        end: buyable.available_till.or_else(|| {
            derive_bound(
                buyable,
                event_start,
                &thresholds.sale_end,
                &thresholds.timezone,
            )
        }),
    }
}

/// Derives one window bound from the event start.
fn derive_bound(
    buyable: &Buyable,
    event_start: Option<OffsetDateTime>,
    offset: &RelativeOffset,
    timezone: &Tz,
) -> Option<OffsetDateTime> {
    let event_start: OffsetDateTime = event_start?;
    let bound: Option<OffsetDateTime> = offset.apply_in(event_start, timezone);
    if bound.is_none() {
        warn!(
            buyable_id = buyable.buyable_id,
            offset = %offset,
            %event_start,
            "Sale window bound out of range; treating as unresolvable"
        );
    }
    bound
}
