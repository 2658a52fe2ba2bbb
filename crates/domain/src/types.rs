// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Default minimum quantity per order.
pub const DEFAULT_ORDER_MIN: u32 = 1;

/// Default maximum quantity per order.
pub const DEFAULT_ORDER_MAX: u32 = 5;

/// The number of units a buyable may sell.
///
/// Storage keeps the legacy integer column where `0` means "use the event's
/// capacity". That sentinel maps to `Inherit`; it never means zero units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "units", rename_all = "snake_case")]
pub enum Capacity {
    /// No item-level limit; the owning event's pool applies.
    #[default]
    Inherit,
    /// An explicit item-level limit.
    Limited(u32),
}

impl Capacity {
    /// Converts a stored capacity column into a `Capacity`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCapacity` for negative values or values
    /// that do not fit in `u32`.
    pub fn from_stored(value: i64) -> Result<Self, DomainError> {
        match value {
            0 => Ok(Self::Inherit),
            v => u32::try_from(v)
                .map(Self::Limited)
                .map_err(|_| DomainError::InvalidCapacity(v)),
        }
    }

    /// Converts this capacity into its stored column value.
    #[must_use]
    pub fn to_stored(self) -> i64 {
        match self {
            Self::Inherit => 0,
            Self::Limited(units) => i64::from(units),
        }
    }

    /// Returns the explicit limit, if any.
    #[must_use]
    pub const fn limit(self) -> Option<u32> {
        match self {
            Self::Inherit => None,
            Self::Limited(units) => Some(units),
        }
    }
}

/// The kind of sellable item.
///
/// Kinds differ in a single capability: whether a purchase creates
/// individual attendee records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuyableKind {
    /// A plain buyable (merchandise, add-ons). Creates no attendees.
    #[default]
    Product,
    /// A ticket. Every unit purchased creates one attendee.
    Ticket,
}

impl BuyableKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Ticket => "ticket",
        }
    }

    /// Returns whether purchasing this kind creates attendee records.
    #[must_use]
    pub const fn creates_attendees(&self) -> bool {
        matches!(self, Self::Ticket)
    }

    /// Builds the attendee drafts for a purchase of `amount` units.
    ///
    /// Kinds that do not create attendees return an empty list.
    #[must_use]
    pub fn create_attendees(&self, buyable_id: i64, amount: u32) -> Vec<AttendeeDraft> {
        if !self.creates_attendees() {
            return Vec::new();
        }
        (0..amount).map(|_| AttendeeDraft::new(buyable_id)).collect()
    }
}

impl FromStr for BuyableKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Self::Product),
            "ticket" => Ok(Self::Ticket),
            _ => Err(DomainError::InvalidBuyableKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for BuyableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sellable item belonging to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyable {
    /// The canonical numeric identifier.
    pub buyable_id: i64,
    /// The owning event.
    pub event_id: i64,
    /// What kind of item this is.
    pub kind: BuyableKind,
    /// Display label.
    pub title: String,
    /// Unit price. Never negative.
    pub price: Decimal,
    /// Manual kill-switch, independent of the computed availability.
    pub is_available: bool,
    /// Explicit sale start. `None` falls back to the event start date.
    #[serde(with = "time::serde::rfc3339::option")]
    pub available_from: Option<OffsetDateTime>,
    /// Explicit sale end. `None` falls back to the event start date.
    #[serde(with = "time::serde::rfc3339::option")]
    pub available_till: Option<OffsetDateTime>,
    /// Minimum quantity per order (inclusive).
    pub order_min: u32,
    /// Maximum quantity per order (inclusive).
    pub order_max: u32,
    /// Item-level capacity.
    pub capacity: Capacity,
    /// Display ordering only.
    pub sort_order: i32,
}

impl Buyable {
    /// Creates a new `Buyable` with the catalog defaults.
    ///
    /// The item starts enabled, free, without explicit dates, inheriting the
    /// event capacity and allowing 1 to 5 units per order.
    #[must_use]
    pub fn new(buyable_id: i64, event_id: i64, kind: BuyableKind, title: &str) -> Self {
        Self {
            buyable_id,
            event_id,
            kind,
            title: title.to_string(),
            price: Decimal::ZERO,
            is_available: true,
            available_from: None,
            available_till: None,
            order_min: DEFAULT_ORDER_MIN,
            order_max: DEFAULT_ORDER_MAX,
            capacity: Capacity::Inherit,
            sort_order: 0,
        }
    }

    /// Returns whether purchasing this item creates attendee records.
    #[must_use]
    pub const fn creates_attendees(&self) -> bool {
        self.kind.creates_attendees()
    }

    /// Builds the attendee drafts for a purchase of `amount` units.
    #[must_use]
    pub fn create_attendees(&self, amount: u32) -> Vec<AttendeeDraft> {
        self.kind.create_attendees(self.buyable_id, amount)
    }
}

/// The event a buyable belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The canonical numeric identifier.
    pub event_id: i64,
    /// Display label.
    pub title: String,
    /// When the event starts, if scheduled.
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    /// Total units the event can hold across all of its buyables.
    pub capacity: u32,
}

impl Event {
    /// Creates a new `Event`.
    #[must_use]
    pub fn new(
        event_id: i64,
        title: &str,
        start_date: Option<OffsetDateTime>,
        capacity: u32,
    ) -> Self {
        Self {
            event_id,
            title: title.to_string(),
            start_date,
            capacity,
        }
    }
}

/// Status of a reservation, owned by the checkout workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Items placed in a cart, not yet submitted.
    Cart,
    /// Submitted and awaiting payment.
    Pending,
    /// Paid.
    Paid,
    /// Cancelled by the buyer or an operator.
    Cancelled,
    /// Cart or pending reservation that timed out.
    Expired,
}

impl ReservationStatus {
    /// Statuses whose order items hold capacity.
    pub const RESERVING: [Self; 3] = [Self::Paid, Self::Cart, Self::Pending];

    /// Statuses whose order items count as sold.
    pub const SOLD: [Self; 1] = [Self::Paid];

    /// Every status.
    pub const ALL: [Self; 5] = [
        Self::Cart,
        Self::Pending,
        Self::Paid,
        Self::Cancelled,
        Self::Expired,
    ];

    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cart => "CART",
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Returns whether order items under this status lock capacity.
    #[must_use]
    pub const fn holds_capacity(&self) -> bool {
        matches!(self, Self::Paid | Self::Cart | Self::Pending)
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CART" => Ok(Self::Cart),
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "CANCELLED" => Ok(Self::Cancelled),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidReservationStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of an individual attendee's ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TicketStatus {
    /// The ticket is valid.
    #[default]
    Active,
    /// The ticket was cancelled.
    Cancelled,
}

impl TicketStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidTicketStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line of a reservation referencing a buyable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The canonical numeric identifier.
    pub order_item_id: i64,
    /// The reservation this line belongs to.
    pub reservation_id: i64,
    /// The buyable purchased.
    pub buyable_id: i64,
    /// Quantity purchased.
    pub amount: u32,
}

/// A seat-holder created by a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// The canonical numeric identifier.
    pub attendee_id: i64,
    /// The reservation that created the attendee.
    pub reservation_id: i64,
    /// The ticket the attendee holds, when linked.
    pub buyable_id: Option<i64>,
    /// Current ticket status.
    pub ticket_status: TicketStatus,
}

/// An attendee that a purchase would create, before it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeDraft {
    /// The ticket the attendee will hold.
    pub buyable_id: i64,
    /// Initial ticket status.
    pub ticket_status: TicketStatus,
}

impl AttendeeDraft {
    /// Creates an active attendee draft for a buyable.
    #[must_use]
    pub const fn new(buyable_id: i64) -> Self {
        Self {
            buyable_id,
            ticket_status: TicketStatus::Active,
        }
    }
}
