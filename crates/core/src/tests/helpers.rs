// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::MemoryReservationStore;
use event_tickets_domain::{
    Attendee, Buyable, BuyableKind, Capacity, Event, OrderItem, ReservationStatus, TicketStatus,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const EVENT_ID: i64 = 1;

/// Inside the default window of the test event.
pub const OPEN_NOW: OffsetDateTime = datetime!(2024-05-20 12:00 UTC);

pub fn create_test_event(capacity: u32) -> Event {
    Event::new(
        EVENT_ID,
        "Summer Festival",
        Some(datetime!(2024-06-01 19:00 UTC)),
        capacity,
    )
}

pub fn create_test_ticket(buyable_id: i64, capacity: Capacity) -> Buyable {
    Buyable {
        capacity,
        ..Buyable::new(buyable_id, EVENT_ID, BuyableKind::Ticket, "Regular")
    }
}

pub fn create_test_product(buyable_id: i64, capacity: Capacity) -> Buyable {
    Buyable {
        capacity,
        ..Buyable::new(buyable_id, EVENT_ID, BuyableKind::Product, "Festival shirt")
    }
}

pub fn create_test_store(buyables: &[&Buyable]) -> MemoryReservationStore {
    let mut store: MemoryReservationStore = MemoryReservationStore::new();
    for buyable in buyables {
        store.register_buyable(buyable);
    }
    store
}

/// Records a reservation holding one order item.
pub fn reserve(
    store: &mut MemoryReservationStore,
    reservation_id: i64,
    status: ReservationStatus,
    buyable_id: i64,
    amount: u32,
) {
    store.put_reservation(reservation_id, status);
    let order_item_id: i64 = store.next_order_item_id();
    store.push_order_item(OrderItem {
        order_item_id,
        reservation_id,
        buyable_id,
        amount,
    });
}

/// Records `count` attendees for a reservation.
pub fn add_attendees(
    store: &mut MemoryReservationStore,
    reservation_id: i64,
    buyable_id: Option<i64>,
    count: i64,
    ticket_status: TicketStatus,
) {
    for n in 0..count {
        store.push_attendee(Attendee {
            attendee_id: reservation_id * 1000 + n,
            reservation_id,
            buyable_id,
            ticket_status,
        });
    }
}
