// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{EVENT_ID, create_test_product, create_test_store, create_test_ticket, reserve};
use crate::{MemoryReservationStore, OrderItemFilter, ReservationStore};
use event_tickets_domain::{
    Attendee, Buyable, Capacity, OrderItem, ReservationStatus, TicketStatus,
};

#[test]
fn test_buyable_filter_respects_statuses() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Inherit);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);
    reserve(&mut store, 1, ReservationStatus::Paid, 10, 2);
    reserve(&mut store, 2, ReservationStatus::Cancelled, 10, 3);

    let paid: Vec<OrderItem> = store
        .order_items(&OrderItemFilter::for_buyable(10, &ReservationStatus::SOLD))
        .unwrap();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].amount, 2);

    let all: Vec<OrderItem> = store
        .order_items(&OrderItemFilter::for_buyable(10, &ReservationStatus::ALL))
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn test_event_filter_spans_registered_buyables() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Inherit);
    let shirt: Buyable = create_test_product(11, Capacity::Limited(50));
    let mut store: MemoryReservationStore = create_test_store(&[&ticket, &shirt]);
    reserve(&mut store, 1, ReservationStatus::Paid, 10, 2);
    reserve(&mut store, 2, ReservationStatus::Cart, 11, 1);
    // Buyable of another event
    reserve(&mut store, 3, ReservationStatus::Paid, 99, 4);

    let items: Vec<OrderItem> = store
        .order_items(&OrderItemFilter::for_event(
            EVENT_ID,
            &ReservationStatus::RESERVING,
        ))
        .unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.buyable_id != 99));
}

#[test]
fn test_reservation_status_update_is_visible() {
    let mut store: MemoryReservationStore = MemoryReservationStore::new();
    reserve(&mut store, 1, ReservationStatus::Cart, 10, 2);
    store.put_reservation(1, ReservationStatus::Expired);

    let items: Vec<OrderItem> = store
        .order_items(&OrderItemFilter::for_buyable(10, &ReservationStatus::RESERVING))
        .unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_attendees_filter_by_ticket_status() {
    let mut store: MemoryReservationStore = MemoryReservationStore::new();
    for (attendee_id, ticket_status) in [
        (1, TicketStatus::Active),
        (2, TicketStatus::Cancelled),
        (3, TicketStatus::Active),
    ] {
        store.push_attendee(Attendee {
            attendee_id,
            reservation_id: 7,
            buyable_id: Some(10),
            ticket_status,
        });
    }

    assert_eq!(store.attendees(7, None).unwrap().len(), 3);
    assert_eq!(
        store.attendees(7, Some(TicketStatus::Active)).unwrap().len(),
        2
    );
    assert!(store.attendees(8, None).unwrap().is_empty());
}

#[test]
fn test_next_order_item_id() {
    let mut store: MemoryReservationStore = MemoryReservationStore::new();
    assert_eq!(store.next_order_item_id(), 1);
    reserve(&mut store, 1, ReservationStatus::Cart, 10, 1);
    reserve(&mut store, 1, ReservationStatus::Cart, 11, 1);
    assert_eq!(store.next_order_item_id(), 3);
}
