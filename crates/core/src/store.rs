// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The reservation read model consumed by the inventory aggregator.
//!
//! Reservations, order items and attendees are owned by the checkout
//! workflow. The core only reads them, through `ReservationStore`.

use event_tickets_domain::{Attendee, Buyable, OrderItem, ReservationStatus, TicketStatus};
use std::collections::BTreeMap;
use std::convert::Infallible;

/// Which order items a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderItemScope {
    /// Order items for a single buyable.
    Buyable(i64),
    /// Order items for every buyable of an event.
    Event(i64),
}

/// A filter over order items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemFilter {
    /// Which buyables to include.
    pub scope: OrderItemScope,
    /// The reservation statuses to include.
    pub statuses: Vec<ReservationStatus>,
}

impl OrderItemFilter {
    /// Order items of one buyable whose reservation is in `statuses`.
    #[must_use]
    pub fn for_buyable(buyable_id: i64, statuses: &[ReservationStatus]) -> Self {
        Self {
            scope: OrderItemScope::Buyable(buyable_id),
            statuses: statuses.to_vec(),
        }
    }

    /// Order items of every buyable of an event whose reservation is in `statuses`.
    #[must_use]
    pub fn for_event(event_id: i64, statuses: &[ReservationStatus]) -> Self {
        Self {
            scope: OrderItemScope::Event(event_id),
            statuses: statuses.to_vec(),
        }
    }
}

/// Read access to reservation state.
///
/// Implementations must return the latest committed state on every call.
/// Callers that need several reads to agree run them against a single
/// transaction-scoped store.
pub trait ReservationStore {
    /// The error returned by failed reads.
    type Error;

    /// Returns the order items matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn order_items(&mut self, filter: &OrderItemFilter) -> Result<Vec<OrderItem>, Self::Error>;

    /// Returns the attendees of a reservation, optionally restricted to one
    /// ticket status.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn attendees(
        &mut self,
        reservation_id: i64,
        ticket_status: Option<TicketStatus>,
    ) -> Result<Vec<Attendee>, Self::Error>;
}

/// An in-process reservation store.
///
/// Holds reservation state in plain vectors. Cloning takes a snapshot that
/// can be read independently.
#[derive(Debug, Clone, Default)]
pub struct MemoryReservationStore {
    /// Event of each known buyable, used for event-scoped queries.
    buyable_events: BTreeMap<i64, i64>,
    reservations: BTreeMap<i64, ReservationStatus>,
    order_items: Vec<OrderItem>,
    attendees: Vec<Attendee>,
}

impl MemoryReservationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a buyable so event-scoped queries can find its order items.
    pub fn register_buyable(&mut self, buyable: &Buyable) {
        self.buyable_events.insert(buyable.buyable_id, buyable.event_id);
    }

    /// Records a reservation, replacing the status of an existing one.
    pub fn put_reservation(&mut self, reservation_id: i64, status: ReservationStatus) {
        self.reservations.insert(reservation_id, status);
    }

    /// Records an order item.
    pub fn push_order_item(&mut self, item: OrderItem) {
        self.order_items.push(item);
    }

    /// Records an attendee.
    pub fn push_attendee(&mut self, attendee: Attendee) {
        self.attendees.push(attendee);
    }

    /// Returns the next free order item id.
    #[must_use]
    pub fn next_order_item_id(&self) -> i64 {
        self.order_items
            .iter()
            .map(|item| item.order_item_id)
            .max()
            .map_or(1, |id| id + 1)
    }

    fn in_scope(&self, item: &OrderItem, scope: OrderItemScope) -> bool {
        match scope {
            OrderItemScope::Buyable(buyable_id) => item.buyable_id == buyable_id,
            OrderItemScope::Event(event_id) => {
                self.buyable_events.get(&item.buyable_id) == Some(&event_id)
            }
        }
    }
}

impl ReservationStore for MemoryReservationStore {
    type Error = Infallible;

    fn order_items(&mut self, filter: &OrderItemFilter) -> Result<Vec<OrderItem>, Self::Error> {
        Ok(self
            .order_items
            .iter()
            .filter(|item| self.in_scope(item, filter.scope))
            .filter(|item| {
                self.reservations
                    .get(&item.reservation_id)
                    .is_some_and(|status| filter.statuses.contains(status))
            })
            .copied()
            .collect())
    }

    fn attendees(
        &mut self,
        reservation_id: i64,
        ticket_status: Option<TicketStatus>,
    ) -> Result<Vec<Attendee>, Self::Error> {
        Ok(self
            .attendees
            .iter()
            .filter(|a| a.reservation_id == reservation_id)
            .filter(|a| ticket_status.is_none_or(|status| a.ticket_status == status))
            .copied()
            .collect())
    }
}
