// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::Persistence;
use event_tickets_domain::{Buyable, BuyableKind, Capacity, Event, ReservationStatus};
use time::macros::datetime;

pub fn create_test_event(persistence: &mut Persistence, capacity: u32) -> Event {
    persistence
        .insert_event(&Event::new(
            0,
            "Summer Festival",
            Some(datetime!(2024-06-01 19:00 UTC)),
            capacity,
        ))
        .unwrap()
}

pub fn create_test_buyable(
    persistence: &mut Persistence,
    event: &Event,
    kind: BuyableKind,
    capacity: Capacity,
) -> Buyable {
    persistence
        .insert_buyable(&Buyable {
            capacity,
            ..Buyable::new(0, event.event_id, kind, "Regular")
        })
        .unwrap()
}

/// Creates a reservation holding one order item and returns its id.
pub fn reserve(
    persistence: &mut Persistence,
    status: ReservationStatus,
    buyable_id: i64,
    amount: u32,
) -> i64 {
    let reservation_id: i64 = persistence.insert_reservation(status).unwrap();
    persistence
        .insert_order_item(reservation_id, buyable_id, amount)
        .unwrap();
    reservation_id
}
