// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation read model queries.
//!
//! Reservation statuses are stored as their string forms, so status filters
//! are translated before they reach the database.

use diesel::SqliteConnection;
use diesel::prelude::*;
use event_tickets::{OrderItemFilter, OrderItemScope};
use event_tickets_domain::{Attendee, OrderItem, TicketStatus};
use tracing::debug;

use crate::data_models::{AttendeeRow, OrderItemRow};
use crate::diesel_schema::{attendees, buyables, order_items, reservations};
use crate::error::PersistenceError;

/// Lists the order items matching a filter, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row cannot be decoded.
pub fn list_order_items(
    conn: &mut SqliteConnection,
    filter: &OrderItemFilter,
) -> Result<Vec<OrderItem>, PersistenceError> {
    let statuses: Vec<&'static str> = filter.statuses.iter().map(|s| s.as_str()).collect();

    debug!(scope = ?filter.scope, statuses = ?filter.statuses, "Loading order items");

    let rows: Vec<OrderItemRow> = match filter.scope {
        OrderItemScope::Buyable(buyable_id) => order_items::table
            .inner_join(reservations::table)
            .filter(reservations::status.eq_any(statuses))
            .filter(order_items::buyable_id.eq(buyable_id))
            .order(order_items::order_item_id.asc())
            .select(OrderItemRow::as_select())
            .load(conn)?,
        OrderItemScope::Event(event_id) => order_items::table
            .inner_join(reservations::table)
            .inner_join(buyables::table)
            .filter(reservations::status.eq_any(statuses))
            .filter(buyables::event_id.eq(event_id))
            .order(order_items::order_item_id.asc())
            .select(OrderItemRow::as_select())
            .load(conn)?,
    };

    rows.into_iter().map(OrderItem::try_from).collect()
}

/// Lists the attendees of a reservation, optionally by ticket status.
///
/// # Errors
///
/// Returns an error if the database query fails or a row cannot be decoded.
pub fn list_attendees(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    ticket_status: Option<TicketStatus>,
) -> Result<Vec<Attendee>, PersistenceError> {
    let mut query = attendees::table
        .filter(attendees::reservation_id.eq(reservation_id))
        .select(AttendeeRow::as_select())
        .into_boxed();
    if let Some(status) = ticket_status {
        query = query.filter(attendees::ticket_status.eq(status.as_str()));
    }

    let rows: Vec<AttendeeRow> = query
        .order(attendees::attendee_id.asc())
        .load(conn)?;

    rows.into_iter().map(Attendee::try_from).collect()
}
