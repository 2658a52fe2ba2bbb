// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to domain values.
//!
//! Stored datetimes are wall-clock strings interpreted in the persistence
//! timezone. Capacity keeps the legacy `0` sentinel for `Capacity::Inherit`.

use diesel::prelude::*;
use event_tickets_domain::{
    Attendee, Buyable, BuyableKind, Capacity, Event, OrderItem, TicketStatus, Tz,
    format_stored_datetime, parse_stored_datetime, resolve_local_datetime, to_local_datetime,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::diesel_schema::{attendees, buyables, events, order_items};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = events)]
pub struct EventRow {
    pub event_id: i64,
    pub title: String,
    pub start_date: Option<String>,
    pub capacity: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = buyables)]
pub struct BuyableRow {
    pub buyable_id: i64,
    pub event_id: i64,
    pub kind: String,
    pub title: String,
    pub price: String,
    pub is_available: i32,
    pub available_from: Option<String>,
    pub available_till: Option<String>,
    pub order_min: i32,
    pub order_max: i32,
    pub capacity: i64,
    pub sort_order: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = order_items)]
pub struct OrderItemRow {
    pub order_item_id: i64,
    pub reservation_id: i64,
    pub buyable_id: i64,
    pub amount: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = attendees)]
pub struct AttendeeRow {
    pub attendee_id: i64,
    pub reservation_id: i64,
    pub buyable_id: Option<i64>,
    pub ticket_status: String,
}

fn corrupt(table: &'static str, id: i64, reason: impl ToString) -> PersistenceError {
    PersistenceError::CorruptRow {
        table,
        id,
        reason: reason.to_string(),
    }
}

fn decode_u32<T>(
    table: &'static str,
    id: i64,
    column: &str,
    value: T,
) -> Result<u32, PersistenceError>
where
    T: Copy + std::fmt::Display,
    u32: TryFrom<T>,
{
    u32::try_from(value)
        .map_err(|_| corrupt(table, id, format!("{column} out of range: {value}")))
}

/// Decodes a stored wall-clock datetime into an instant.
pub fn decode_datetime(
    value: Option<&str>,
    timezone: &Tz,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value
        .map(|v| -> Result<OffsetDateTime, PersistenceError> {
            let local = parse_stored_datetime(v)?;
            Ok(resolve_local_datetime(local, timezone)?)
        })
        .transpose()
}

/// Encodes an instant as a stored wall-clock datetime.
pub fn encode_datetime(
    value: Option<OffsetDateTime>,
    timezone: &Tz,
) -> Result<Option<String>, PersistenceError> {
    value
        .map(|v| -> Result<String, PersistenceError> {
            Ok(format_stored_datetime(to_local_datetime(v, timezone)?))
        })
        .transpose()
}

impl EventRow {
    pub fn into_event(self, timezone: &Tz) -> Result<Event, PersistenceError> {
        Ok(Event {
            event_id: self.event_id,
            start_date: decode_datetime(self.start_date.as_deref(), timezone)?,
            capacity: decode_u32("events", self.event_id, "capacity", self.capacity)?,
            title: self.title,
        })
    }
}

impl BuyableRow {
    pub fn into_buyable(self, timezone: &Tz) -> Result<Buyable, PersistenceError> {
        let id: i64 = self.buyable_id;
        Ok(Buyable {
            buyable_id: id,
            event_id: self.event_id,
            kind: BuyableKind::from_str(&self.kind)?,
            price: Decimal::from_str(&self.price).map_err(|e| corrupt("buyables", id, e))?,
            is_available: self.is_available != 0,
            available_from: decode_datetime(self.available_from.as_deref(), timezone)?,
            available_till: decode_datetime(self.available_till.as_deref(), timezone)?,
            order_min: decode_u32("buyables", id, "order_min", self.order_min)?,
            order_max: decode_u32("buyables", id, "order_max", self.order_max)?,
            capacity: Capacity::from_stored(self.capacity)?,
            sort_order: self.sort_order,
            title: self.title,
        })
    }
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = PersistenceError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            order_item_id: row.order_item_id,
            reservation_id: row.reservation_id,
            buyable_id: row.buyable_id,
            amount: decode_u32("order_items", row.order_item_id, "amount", row.amount)?,
        })
    }
}

impl TryFrom<AttendeeRow> for Attendee {
    type Error = PersistenceError;

    fn try_from(row: AttendeeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            attendee_id: row.attendee_id,
            reservation_id: row.reservation_id,
            buyable_id: row.buyable_id,
            ticket_status: TicketStatus::from_str(&row.ticket_status)?,
        })
    }
}
