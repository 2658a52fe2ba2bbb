// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use event_tickets_domain::{SaleThresholds, Tz, parse_timezone};
use tracing::info;

/// Process-wide sale settings.
///
/// Loaded once at startup and passed explicitly into every evaluation.
/// The thresholds step the calendar in the same timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleConfig {
    /// Offsets used to derive sale windows from event start dates.
    pub thresholds: SaleThresholds,
    /// Timezone in which stored wall-clock dates are interpreted.
    pub timezone: Tz,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            thresholds: SaleThresholds::default(),
            timezone: Tz::UTC,
        }
    }
}

impl SaleConfig {
    /// Builds a configuration from raw settings.
    ///
    /// # Arguments
    ///
    /// * `sale_start` - Relative offset at which sales open, e.g. `-3 weeks`
    /// * `sale_end` - Relative offset at which sales close, e.g. `-12 hours`
    /// * `timezone` - IANA timezone identifier
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if an offset expression or the
    /// timezone is malformed.
    pub fn from_settings(sale_start: &str, sale_end: &str, timezone: &str) -> Result<Self, CoreError> {
        let thresholds: SaleThresholds =
            SaleThresholds::parse(sale_start, sale_end).map_err(CoreError::Configuration)?;
        let timezone: Tz = parse_timezone(timezone).map_err(CoreError::Configuration)?;
        let thresholds: SaleThresholds = thresholds.with_timezone(timezone);

        info!(
            sale_start = %thresholds.sale_start,
            sale_end = %thresholds.sale_end,
            timezone = %timezone,
            "Loaded sale configuration"
        );

        Ok(Self {
            thresholds,
            timezone,
        })
    }
}
