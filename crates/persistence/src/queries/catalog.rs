// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use event_tickets_domain::{Buyable, Event, Tz};
use tracing::debug;

use crate::data_models::{BuyableRow, EventRow};
use crate::diesel_schema::{buyables, events};
use crate::error::PersistenceError;

/// Retrieves an event by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the event is not found.
pub fn get_event(
    conn: &mut SqliteConnection,
    timezone: &Tz,
    event_id: i64,
) -> Result<Option<Event>, PersistenceError> {
    debug!(event_id, "Looking up event");

    events::table
        .filter(events::event_id.eq(event_id))
        .select(EventRow::as_select())
        .first(conn)
        .optional()?
        .map(|row| row.into_event(timezone))
        .transpose()
}

/// Retrieves a buyable by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the buyable is not found.
pub fn get_buyable(
    conn: &mut SqliteConnection,
    timezone: &Tz,
    buyable_id: i64,
) -> Result<Option<Buyable>, PersistenceError> {
    debug!(buyable_id, "Looking up buyable");

    buyables::table
        .filter(buyables::buyable_id.eq(buyable_id))
        .select(BuyableRow::as_select())
        .first(conn)
        .optional()?
        .map(|row| row.into_buyable(timezone))
        .transpose()
}

/// Lists the buyables of an event in display order.
///
/// Ordered by `sort_order` ascending, then by sale start descending so the
/// most recently opened item of a group comes first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row cannot be decoded.
pub fn list_buyables_for_event(
    conn: &mut SqliteConnection,
    timezone: &Tz,
    event_id: i64,
) -> Result<Vec<Buyable>, PersistenceError> {
    let rows: Vec<BuyableRow> = buyables::table
        .filter(buyables::event_id.eq(event_id))
        .order((
            buyables::sort_order.asc(),
            buyables::available_from.desc(),
            buyables::buyable_id.asc(),
        ))
        .select(BuyableRow::as_select())
        .load(conn)?;

    debug!(event_id, count = rows.len(), "Listed buyables for event");

    rows.into_iter()
        .map(|row| row.into_buyable(timezone))
        .collect()
}
