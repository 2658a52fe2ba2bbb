// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    OPEN_NOW, create_test_event, create_test_product, create_test_store, create_test_ticket,
    reserve,
};
use crate::{
    AvailabilityReport, MemoryReservationStore, SoldStatus, UnavailableReason, evaluate,
    is_available, remaining_capacity, sold_status,
};
use event_tickets_domain::{Buyable, Capacity, Event, ReservationStatus, SaleThresholds};
use std::thread;
use time::macros::datetime;

#[test]
fn test_disabled_flag_wins() {
    let ticket: Buyable = Buyable {
        is_available: false,
        ..create_test_ticket(10, Capacity::Limited(10))
    };
    let event: Event = create_test_event(100);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);

    for now in [
        OPEN_NOW,
        datetime!(2020-01-01 00:00 UTC),
        datetime!(2030-01-01 00:00 UTC),
    ] {
        assert!(
            !is_available(
                &mut store,
                &ticket,
                Some(&event),
                &SaleThresholds::default(),
                now
            )
            .unwrap()
        );
    }

    let report: AvailabilityReport = evaluate(
        &mut store,
        &ticket,
        Some(&event),
        &SaleThresholds::default(),
        OPEN_NOW,
    )
    .unwrap();
    assert_eq!(report.reason, Some(UnavailableReason::Disabled));
}

#[test]
fn test_no_dates_and_no_event_start_is_unavailable() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Limited(10));
    let event: Event = Event::new(1, "Unscheduled", None, 100);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);

    assert!(
        !is_available(
            &mut store,
            &ticket,
            Some(&event),
            &SaleThresholds::default(),
            OPEN_NOW
        )
        .unwrap()
    );
    assert!(
        !is_available(
            &mut store,
            &ticket,
            None,
            &SaleThresholds::default(),
            OPEN_NOW
        )
        .unwrap()
    );

    let report: AvailabilityReport = evaluate(
        &mut store,
        &ticket,
        None,
        &SaleThresholds::default(),
        OPEN_NOW,
    )
    .unwrap();
    assert_eq!(report.reason, Some(UnavailableReason::NoSaleWindow));
    assert!(!report.window.is_defined());
}

#[test]
fn test_only_one_explicit_bound_without_event_start_is_unavailable() {
    let ticket: Buyable = Buyable {
        available_from: Some(datetime!(2024-01-01 00:00 UTC)),
        ..create_test_ticket(10, Capacity::Limited(10))
    };
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);

    let report: AvailabilityReport = evaluate(
        &mut store,
        &ticket,
        None,
        &SaleThresholds::default(),
        OPEN_NOW,
    )
    .unwrap();
    assert!(!report.available);
    assert_eq!(report.reason, Some(UnavailableReason::OutsideSaleWindow));
}

#[test]
fn test_window_bounds_are_inclusive() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Limited(10));
    let event: Event = create_test_event(100);
    let thresholds: SaleThresholds = SaleThresholds::default();
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);

    let cases = [
        (datetime!(2024-05-11 18:59:59 UTC), false),
        (datetime!(2024-05-11 19:00 UTC), true),
        (datetime!(2024-06-01 07:00 UTC), true),
        (datetime!(2024-06-01 07:00:01 UTC), false),
    ];
    for (now, expected) in cases {
        assert_eq!(
            is_available(&mut store, &ticket, Some(&event), &thresholds, now).unwrap(),
            expected,
            "at {now}"
        );
    }
}

#[test]
fn test_window_outside_reports_reason() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Limited(10));
    let event: Event = create_test_event(100);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);

    let report: AvailabilityReport = evaluate(
        &mut store,
        &ticket,
        Some(&event),
        &SaleThresholds::default(),
        datetime!(2024-06-01 19:00 UTC),
    )
    .unwrap();
    assert_eq!(report.reason, Some(UnavailableReason::OutsideSaleWindow));
    assert_eq!(report.window.start, Some(datetime!(2024-05-11 19:00 UTC)));
    assert_eq!(report.window.end, Some(datetime!(2024-06-01 07:00 UTC)));
}

#[test]
fn test_capacity_ten_with_six_paid_is_available() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Limited(10));
    let event: Event = create_test_event(100);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);
    for reservation_id in 1..=3 {
        reserve(&mut store, reservation_id, ReservationStatus::Paid, 10, 2);
    }

    assert_eq!(
        remaining_capacity(&mut store, &ticket, Some(&event)).unwrap(),
        4
    );
    assert!(
        is_available(
            &mut store,
            &ticket,
            Some(&event),
            &SaleThresholds::default(),
            OPEN_NOW
        )
        .unwrap()
    );
}

#[test]
fn test_capacity_five_fully_paid_is_sold_out() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Limited(5));
    let event: Event = create_test_event(100);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);
    for reservation_id in 1..=5 {
        reserve(&mut store, reservation_id, ReservationStatus::Paid, 10, 1);
    }

    let report: AvailabilityReport = evaluate(
        &mut store,
        &ticket,
        Some(&event),
        &SaleThresholds::default(),
        OPEN_NOW,
    )
    .unwrap();
    assert_eq!(report.remaining_capacity, 0);
    assert!(!report.available);
    assert_eq!(report.reason, Some(UnavailableReason::SoldOut));
}

#[test]
fn test_carts_hold_capacity_until_expired() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Limited(2));
    let event: Event = create_test_event(100);
    let thresholds: SaleThresholds = SaleThresholds::default();
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);
    reserve(&mut store, 1, ReservationStatus::Cart, 10, 1);
    reserve(&mut store, 2, ReservationStatus::Pending, 10, 1);

    assert!(!is_available(&mut store, &ticket, Some(&event), &thresholds, OPEN_NOW).unwrap());

    store.put_reservation(1, ReservationStatus::Expired);
    assert!(is_available(&mut store, &ticket, Some(&event), &thresholds, OPEN_NOW).unwrap());
}

#[test]
fn test_inherit_skips_capacity_gate() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Inherit);
    let event: Event = create_test_event(2);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);
    reserve(&mut store, 1, ReservationStatus::Paid, 10, 2);

    let report: AvailabilityReport = evaluate(
        &mut store,
        &ticket,
        Some(&event),
        &SaleThresholds::default(),
        OPEN_NOW,
    )
    .unwrap();
    assert!(report.available);
    assert_eq!(report.remaining_capacity, 0);
}

#[test]
fn test_availability_is_idempotent() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Limited(3));
    let event: Event = create_test_event(100);
    let thresholds: SaleThresholds = SaleThresholds::default();
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);
    reserve(&mut store, 1, ReservationStatus::Paid, 10, 2);

    let first: AvailabilityReport =
        evaluate(&mut store, &ticket, Some(&event), &thresholds, OPEN_NOW).unwrap();
    let second: AvailabilityReport =
        evaluate(&mut store, &ticket, Some(&event), &thresholds, OPEN_NOW).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        is_available(&mut store, &ticket, Some(&event), &thresholds, OPEN_NOW).unwrap(),
        is_available(&mut store, &ticket, Some(&event), &thresholds, OPEN_NOW).unwrap()
    );
}

#[test]
fn test_sold_status_uses_item_or_event_capacity() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Inherit);
    let shirt: Buyable = create_test_product(11, Capacity::Limited(40));
    let event: Event = create_test_event(250);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket, &shirt]);
    reserve(&mut store, 1, ReservationStatus::Paid, 11, 3);

    let inherited: SoldStatus = sold_status(&mut store, &ticket, Some(&event)).unwrap();
    assert_eq!(
        inherited,
        SoldStatus {
            sold: 0,
            capacity: 250
        }
    );

    let limited: SoldStatus = sold_status(&mut store, &shirt, Some(&event)).unwrap();
    assert_eq!(limited.to_string(), "3/40");
}

#[test]
fn test_concurrent_readers_agree() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Limited(10));
    let event: Event = create_test_event(100);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);
    reserve(&mut store, 1, ReservationStatus::Paid, 10, 7);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mut snapshot: MemoryReservationStore = store.clone();
            let ticket: Buyable = ticket.clone();
            let event: Event = event.clone();
            thread::spawn(move || {
                evaluate(
                    &mut snapshot,
                    &ticket,
                    Some(&event),
                    &SaleThresholds::default(),
                    OPEN_NOW,
                )
                .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let report: AvailabilityReport = handle.join().unwrap();
        assert!(report.available);
        assert_eq!(report.remaining_capacity, 3);
    }
}

#[test]
fn test_report_serializes_reason_in_snake_case() {
    let ticket: Buyable = create_test_ticket(10, Capacity::Limited(1));
    let event: Event = create_test_event(100);
    let mut store: MemoryReservationStore = create_test_store(&[&ticket]);
    reserve(&mut store, 1, ReservationStatus::Paid, 10, 1);

    let report: AvailabilityReport = evaluate(
        &mut store,
        &ticket,
        Some(&event),
        &SaleThresholds::default(),
        OPEN_NOW,
    )
    .unwrap();
    let json: serde_json::Value = serde_json::to_value(report).unwrap();
    assert_eq!(json["reason"], "sold_out");
    assert_eq!(json["sold"]["capacity"], 1);
    assert_eq!(json["window"]["start"], "2024-05-11T19:00:00Z");
}
