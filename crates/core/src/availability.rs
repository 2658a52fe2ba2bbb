// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Purchasability of buyables.
//!
//! A buyable is available when, in order:
//!
//! 1. Its manual availability flag is on
//! 2. A sale window can be resolved (fail-closed when it cannot)
//! 3. `now` lies inside the window, both bounds inclusive
//! 4. A `Limited` capacity has units remaining
//!
//! `Inherit` capacity skips step 4. The event pool is the event's own
//! concern and is reported, not enforced, here.

use crate::inventory::{remaining_capacity, sold_count};
use crate::store::ReservationStore;
use event_tickets_domain::{
    Buyable, Capacity, Event, SaleThresholds, SaleWindow, resolve_sale_window,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

/// Why a buyable cannot be purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The manual availability flag is off.
    Disabled,
    /// No explicit dates and no event start date to derive them from.
    NoSaleWindow,
    /// `now` is outside the sale window, or only one bound is known.
    OutsideSaleWindow,
    /// The buyable's own capacity is used up.
    SoldOut,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "sales are disabled"),
            Self::NoSaleWindow => write!(f, "no sale window"),
            Self::OutsideSaleWindow => write!(f, "outside the sale window"),
            Self::SoldOut => write!(f, "sold out"),
        }
    }
}

/// Units sold against the displayed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldStatus {
    pub sold: u64,
    pub capacity: u64,
}

impl std::fmt::Display for SoldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.sold, self.capacity)
    }
}

/// Everything known about a buyable's availability at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub buyable_id: i64,
    pub available: bool,
    pub reason: Option<UnavailableReason>,
    pub window: SaleWindow,
    pub remaining_capacity: u64,
    pub sold: SoldStatus,
}

fn unavailable_reason<S: ReservationStore + ?Sized>(
    store: &mut S,
    buyable: &Buyable,
    event: Option<&Event>,
    window: &SaleWindow,
    now: OffsetDateTime,
) -> Result<Option<UnavailableReason>, S::Error> {
    if !buyable.is_available {
        return Ok(Some(UnavailableReason::Disabled));
    }
    if !window.is_defined() {
        return Ok(Some(UnavailableReason::NoSaleWindow));
    }
    if !window.contains(now) {
        return Ok(Some(UnavailableReason::OutsideSaleWindow));
    }
    if matches!(buyable.capacity, Capacity::Limited(_))
        && remaining_capacity(store, buyable, event)? == 0
    {
        return Ok(Some(UnavailableReason::SoldOut));
    }
    Ok(None)
}

/// Returns whether a buyable can be purchased at `now`.
///
/// # Arguments
///
/// * `store` - The reservation read model
/// * `buyable` - The buyable to check
/// * `event` - The owning event, if it could be loaded
/// * `thresholds` - Offsets for deriving the window from the event start
/// * `now` - The instant to evaluate at
///
/// # Errors
///
/// Returns the store's error if a capacity read fails. Being unavailable is
/// never an error.
pub fn is_available<S: ReservationStore + ?Sized>(
    store: &mut S,
    buyable: &Buyable,
    event: Option<&Event>,
    thresholds: &SaleThresholds,
    now: OffsetDateTime,
) -> Result<bool, S::Error> {
    let window: SaleWindow = resolve_sale_window(buyable, event, thresholds);
    let reason: Option<UnavailableReason> =
        unavailable_reason(store, buyable, event, &window, now)?;

    match reason {
        Some(reason) => {
            debug!(buyable_id = buyable.buyable_id, %now, %reason, "Buyable unavailable");
            Ok(false)
        }
        None => {
            debug!(buyable_id = buyable.buyable_id, %now, "Buyable available");
            Ok(true)
        }
    }
}

/// Returns the units sold and the capacity they are shown against.
///
/// The capacity is the buyable's own limit, or the event's capacity when the
/// buyable inherits. This is for display and never gates a purchase.
///
/// # Errors
///
/// Returns the store's error if a read fails.
pub fn sold_status<S: ReservationStore + ?Sized>(
    store: &mut S,
    buyable: &Buyable,
    event: Option<&Event>,
) -> Result<SoldStatus, S::Error> {
    let capacity: u64 = match buyable.capacity {
        Capacity::Limited(units) => u64::from(units),
        Capacity::Inherit => event.map_or(0, |e| u64::from(e.capacity)),
    };
    Ok(SoldStatus {
        sold: sold_count(store, buyable)?,
        capacity,
    })
}

/// Evaluates a buyable in full: window, decision, remaining and sold units.
///
/// Run it against a transaction-scoped store so every figure comes from the
/// same snapshot.
///
/// # Errors
///
/// Returns the store's error if a read fails.
pub fn evaluate<S: ReservationStore + ?Sized>(
    store: &mut S,
    buyable: &Buyable,
    event: Option<&Event>,
    thresholds: &SaleThresholds,
    now: OffsetDateTime,
) -> Result<AvailabilityReport, S::Error> {
    let window: SaleWindow = resolve_sale_window(buyable, event, thresholds);
    let reason: Option<UnavailableReason> =
        unavailable_reason(store, buyable, event, &window, now)?;
    let remaining: u64 = remaining_capacity(store, buyable, event)?;
    let sold: SoldStatus = sold_status(store, buyable, event)?;

    debug!(
        buyable_id = buyable.buyable_id,
        available = reason.is_none(),
        remaining,
        %sold,
        "Evaluated buyable"
    );

    Ok(AvailabilityReport {
        buyable_id: buyable.buyable_id,
        available: reason.is_none(),
        reason,
        window,
        remaining_capacity: remaining,
        sold,
    })
}
