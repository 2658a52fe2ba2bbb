// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod local_time;
mod sale_threshold;
mod sale_window;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use local_time::{
    format_stored_datetime, parse_stored_datetime, parse_timezone, resolve_local_datetime,
    to_local_datetime,
};
pub use sale_threshold::RelativeOffset;
pub use sale_window::{
    DEFAULT_SALE_END_THRESHOLD, DEFAULT_SALE_START_THRESHOLD, SaleThresholds, SaleWindow,
    resolve_sale_window,
};
pub use types::{
    Attendee, AttendeeDraft, Buyable, BuyableKind, Capacity, DEFAULT_ORDER_MAX,
    DEFAULT_ORDER_MIN, Event, OrderItem, ReservationStatus, TicketStatus,
};
pub use validation::{validate_buyable, validate_order_amount};

// Re-exported so downstream crates name the same timezone type.
pub use chrono_tz::Tz;
