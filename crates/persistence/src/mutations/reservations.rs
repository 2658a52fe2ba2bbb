// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use event_tickets_domain::{Attendee, AttendeeDraft, OrderItem, ReservationStatus, TicketStatus};
use tracing::{debug, info};

use crate::diesel_schema::{attendees, order_items, reservations};
use crate::error::PersistenceError;

/// Creates a reservation with the given status.
///
/// # Errors
///
/// Returns an error if the reservation cannot be stored.
pub fn insert_reservation(
    conn: &mut SqliteConnection,
    status: ReservationStatus,
) -> Result<i64, PersistenceError> {
    let reservation_id: i64 = diesel::insert_into(reservations::table)
        .values(reservations::status.eq(status.as_str()))
        .returning(reservations::reservation_id)
        .get_result(conn)?;

    info!(reservation_id, %status, "Created reservation");
    Ok(reservation_id)
}

/// Moves a reservation to a new status.
///
/// # Errors
///
/// Returns `PersistenceError::ReservationNotFound` if no such reservation
/// exists, or an error if the update fails.
pub fn set_reservation_status(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    status: ReservationStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(reservations::table)
        .filter(reservations::reservation_id.eq(reservation_id))
        .set(reservations::status.eq(status.as_str()))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ReservationNotFound(reservation_id));
    }

    info!(reservation_id, %status, "Updated reservation status");
    Ok(())
}

/// Adds an order item to a reservation.
///
/// # Errors
///
/// Returns an error if the item cannot be stored (for example when the
/// reservation or buyable does not exist).
pub fn insert_order_item(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    buyable_id: i64,
    amount: u32,
) -> Result<OrderItem, PersistenceError> {
    let stored_amount: i32 = i32::try_from(amount).map_err(|_| {
        PersistenceError::QueryFailed(format!("Order item amount {amount} out of range"))
    })?;

    let order_item_id: i64 = diesel::insert_into(order_items::table)
        .values((
            order_items::reservation_id.eq(reservation_id),
            order_items::buyable_id.eq(buyable_id),
            order_items::amount.eq(stored_amount),
        ))
        .returning(order_items::order_item_id)
        .get_result(conn)?;

    debug!(order_item_id, reservation_id, buyable_id, amount, "Created order item");

    Ok(OrderItem {
        order_item_id,
        reservation_id,
        buyable_id,
        amount,
    })
}

/// Adds an attendee to a reservation.
///
/// # Errors
///
/// Returns an error if the attendee cannot be stored.
pub fn insert_attendee(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    buyable_id: Option<i64>,
    ticket_status: TicketStatus,
) -> Result<Attendee, PersistenceError> {
    let attendee_id: i64 = diesel::insert_into(attendees::table)
        .values((
            attendees::reservation_id.eq(reservation_id),
            attendees::buyable_id.eq(buyable_id),
            attendees::ticket_status.eq(ticket_status.as_str()),
        ))
        .returning(attendees::attendee_id)
        .get_result(conn)?;

    debug!(attendee_id, reservation_id, ?buyable_id, "Created attendee");

    Ok(Attendee {
        attendee_id,
        reservation_id,
        buyable_id,
        ticket_status,
    })
}

/// Stores the attendees a purchase produced.
///
/// # Errors
///
/// Returns an error if any attendee cannot be stored.
pub fn insert_attendees(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    drafts: &[AttendeeDraft],
) -> Result<Vec<Attendee>, PersistenceError> {
    drafts
        .iter()
        .map(|draft| {
            insert_attendee(
                conn,
                reservation_id,
                Some(draft.buyable_id),
                draft.ticket_status,
            )
        })
        .collect()
}
