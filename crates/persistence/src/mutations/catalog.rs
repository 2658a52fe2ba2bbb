// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use event_tickets_domain::{Buyable, DomainError, Event, Tz, validate_buyable};
use tracing::info;

use crate::data_models::encode_datetime;
use crate::diesel_schema::{buyables, events};
use crate::error::PersistenceError;

fn to_column(field: &'static str, value: u32) -> Result<i32, PersistenceError> {
    i32::try_from(value).map_err(|_| {
        PersistenceError::DomainViolation(DomainError::InvariantViolation {
            field,
            reason: format!("{value} does not fit in storage"),
        })
    })
}

/// Creates a new event.
///
/// The `event_id` of `event` is ignored; the stored event is returned
/// with its assigned identifier.
///
/// # Errors
///
/// Returns an error if the event cannot be stored.
pub fn insert_event(
    conn: &mut SqliteConnection,
    timezone: &Tz,
    event: &Event,
) -> Result<Event, PersistenceError> {
    let start_date: Option<String> = encode_datetime(event.start_date, timezone)?;

    let event_id: i64 = diesel::insert_into(events::table)
        .values((
            events::title.eq(&event.title),
            events::start_date.eq(start_date),
            events::capacity.eq(i64::from(event.capacity)),
        ))
        .returning(events::event_id)
        .get_result(conn)?;

    info!(event_id, title = %event.title, "Created event");

    Ok(Event {
        event_id,
        ..event.clone()
    })
}

/// Creates a new buyable after validating it.
///
/// The `buyable_id` of `buyable` is ignored; the stored buyable is returned
/// with its assigned identifier.
///
/// # Errors
///
/// Returns `PersistenceError::DomainViolation` if the buyable fails
/// validation, or an error if it cannot be stored (for example when its
/// event does not exist).
pub fn insert_buyable(
    conn: &mut SqliteConnection,
    timezone: &Tz,
    buyable: &Buyable,
) -> Result<Buyable, PersistenceError> {
    validate_buyable(buyable)?;

    let buyable_id: i64 = diesel::insert_into(buyables::table)
        .values((
            buyables::event_id.eq(buyable.event_id),
            buyables::kind.eq(buyable.kind.as_str()),
            buyables::title.eq(&buyable.title),
            buyables::price.eq(buyable.price.to_string()),
            buyables::is_available.eq(i32::from(buyable.is_available)),
            buyables::available_from.eq(encode_datetime(buyable.available_from, timezone)?),
            buyables::available_till.eq(encode_datetime(buyable.available_till, timezone)?),
            buyables::order_min.eq(to_column("order_min", buyable.order_min)?),
            buyables::order_max.eq(to_column("order_max", buyable.order_max)?),
            buyables::capacity.eq(buyable.capacity.to_stored()),
            buyables::sort_order.eq(buyable.sort_order),
        ))
        .returning(buyables::buyable_id)
        .get_result(conn)?;

    info!(
        buyable_id,
        event_id = buyable.event_id,
        kind = %buyable.kind,
        "Created buyable"
    );

    Ok(Buyable {
        buyable_id,
        ..buyable.clone()
    })
}
