// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sold, reserved and remaining unit counts.
//!
//! ## Invariants
//!
//! - Every count is read from the store at call time; nothing is cached
//! - Remaining capacity is clamped at zero, never negative
//! - `Capacity::Inherit` buyables draw from the event pool, which every
//!   buyable of the event consumes

use crate::store::{OrderItemFilter, ReservationStore};
use event_tickets_domain::{
    Attendee, Buyable, BuyableKind, Capacity, Event, OrderItem, ReservationStatus, TicketStatus,
};
use std::collections::BTreeSet;
use tracing::debug;

fn sum_amounts(items: &[OrderItem]) -> u64 {
    items.iter().map(|item| u64::from(item.amount)).sum()
}

/// Returns the number of units of a buyable that count as sold.
///
/// Only PAID reservations count. For ticket kinds this is the number of
/// active attendees in the reservations holding this ticket, so cancelled
/// seats are excluded. Attendees linked to a different buyable are skipped;
/// unlinked attendees count.
/// Product kinds create no attendees and sum their order item amounts.
///
/// # Errors
///
/// Returns the store's error if a read fails.
pub fn sold_count<S: ReservationStore + ?Sized>(
    store: &mut S,
    buyable: &Buyable,
) -> Result<u64, S::Error> {
    let items: Vec<OrderItem> = store.order_items(&OrderItemFilter::for_buyable(
        buyable.buyable_id,
        &ReservationStatus::SOLD,
    ))?;

    let sold: u64 = match buyable.kind {
        BuyableKind::Product => sum_amounts(&items),
        BuyableKind::Ticket => {
            // A reservation may hold several lines for the same ticket;
            // its attendees must only be counted once.
            let reservations: BTreeSet<i64> =
                items.iter().map(|item| item.reservation_id).collect();
            let mut active: u64 = 0;
            for reservation_id in reservations {
                let attendees: Vec<Attendee> =
                    store.attendees(reservation_id, Some(TicketStatus::Active))?;
                active += attendees
                    .iter()
                    .filter(|a| a.buyable_id.is_none_or(|id| id == buyable.buyable_id))
                    .map(|_| 1_u64)
                    .sum::<u64>();
            }
            active
        }
    };

    debug!(buyable_id = buyable.buyable_id, kind = %buyable.kind, sold, "Computed sold count");
    Ok(sold)
}

/// Returns the units of a buyable held by PAID, CART or PENDING reservations.
///
/// # Errors
///
/// Returns the store's error if a read fails.
pub fn reserved_count<S: ReservationStore + ?Sized>(
    store: &mut S,
    buyable_id: i64,
) -> Result<u64, S::Error> {
    let items: Vec<OrderItem> = store.order_items(&OrderItemFilter::for_buyable(
        buyable_id,
        &ReservationStatus::RESERVING,
    ))?;
    let reserved: u64 = sum_amounts(&items);
    debug!(buyable_id, reserved, "Computed reserved count");
    Ok(reserved)
}

/// Returns the units held across every buyable of an event.
///
/// # Errors
///
/// Returns the store's error if a read fails.
pub fn event_reserved_count<S: ReservationStore + ?Sized>(
    store: &mut S,
    event_id: i64,
) -> Result<u64, S::Error> {
    let items: Vec<OrderItem> = store.order_items(&OrderItemFilter::for_event(
        event_id,
        &ReservationStatus::RESERVING,
    ))?;
    let reserved: u64 = sum_amounts(&items);
    debug!(event_id, reserved, "Computed event reserved count");
    Ok(reserved)
}

/// Returns the units left in an event's shared pool.
///
/// # Errors
///
/// Returns the store's error if a read fails.
pub fn event_remaining_capacity<S: ReservationStore + ?Sized>(
    store: &mut S,
    event: &Event,
) -> Result<u64, S::Error> {
    let reserved: u64 = event_reserved_count(store, event.event_id)?;
    Ok(u64::from(event.capacity).saturating_sub(reserved))
}

/// Returns how many more units of a buyable can be reserved.
///
/// A `Limited` capacity is reduced by the buyable's own reservations. An
/// `Inherit` capacity defers to the event pool; without an event there is
/// no pool and nothing remains.
///
/// # Errors
///
/// Returns the store's error if a read fails.
pub fn remaining_capacity<S: ReservationStore + ?Sized>(
    store: &mut S,
    buyable: &Buyable,
    event: Option<&Event>,
) -> Result<u64, S::Error> {
    match buyable.capacity {
        Capacity::Limited(units) => {
            let reserved: u64 = reserved_count(store, buyable.buyable_id)?;
            Ok(u64::from(units).saturating_sub(reserved))
        }
        Capacity::Inherit => match event {
            Some(event) => event_remaining_capacity(store, event),
            None => {
                debug!(
                    buyable_id = buyable.buyable_id,
                    "Buyable inherits capacity but has no event; nothing remains"
                );
                Ok(0)
            }
        },
    }
}

/// Returns whether a buyable's kind can no longer change.
///
/// The kind is fixed once any order item references the buyable, in any
/// reservation status.
///
/// # Errors
///
/// Returns the store's error if a read fails.
pub fn is_kind_locked<S: ReservationStore + ?Sized>(
    store: &mut S,
    buyable_id: i64,
) -> Result<bool, S::Error> {
    let items: Vec<OrderItem> =
        store.order_items(&OrderItemFilter::for_buyable(buyable_id, &ReservationStatus::ALL))?;
    Ok(!items.is_empty())
}
