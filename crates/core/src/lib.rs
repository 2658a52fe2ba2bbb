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

mod availability;
mod config;
mod error;
mod inventory;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use availability::{
    AvailabilityReport, SoldStatus, UnavailableReason, evaluate, is_available, sold_status,
};
pub use config::SaleConfig;
pub use error::CoreError;
pub use inventory::{
    event_remaining_capacity, event_reserved_count, is_kind_locked, remaining_capacity,
    reserved_count, sold_count,
};
pub use store::{MemoryReservationStore, OrderItemFilter, OrderItemScope, ReservationStore};
