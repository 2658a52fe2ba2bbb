// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for event ticket sales.
//!
//! This crate stores the catalog (events and buyables) and the reservation
//! read model (reservations, order items, attendees) in `SQLite` through
//! Diesel, and implements `ReservationStore` on top of it.
//!
//! ## Consistent reads
//!
//! Capacity checks race with concurrent checkouts. A checkout must re-read
//! remaining capacity and insert its order item in one atomic unit:
//!
//! ```ignore
//! persistence.consistent_read(|store| {
//!     let remaining = remaining_capacity(store, &buyable, Some(&event))?;
//!     if remaining >= u64::from(amount) {
//!         store.insert_order_item(reservation_id, buyable.buyable_id, amount)?;
//!     }
//!     Ok(remaining)
//! })?;
//! ```
//!
//! `consistent_read` opens an `IMMEDIATE` transaction, taking the write lock
//! up front so two checkouts cannot both observe the last unit.
//!
//! ## Stored datetimes
//!
//! Dates are stored as wall-clock strings and interpreted in the timezone
//! given to `with_timezone` (UTC by default).

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use event_tickets::{OrderItemFilter, ReservationStore};
use event_tickets_domain::{
    Attendee, AttendeeDraft, Buyable, Event, OrderItem, ReservationStatus, TicketStatus, Tz,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Persistence adapter for the catalog and reservation read model.
pub struct Persistence {
    conn: SqliteConnection,
    timezone: Tz,
}

/// A store bound to one connection, usually inside a transaction.
///
/// Obtained from `Persistence::consistent_read`. Every read and write made
/// through it sees the same snapshot.
pub struct Store<'a> {
    conn: &'a mut SqliteConnection,
    timezone: Tz,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// so tests are isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_tickets_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            timezone: Tz::UTC,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // Enable WAL mode for better read concurrency
        backend::sqlite::enable_wal_mode(&mut conn)?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            timezone: Tz::UTC,
        })
    }

    /// Sets the timezone in which stored wall-clock dates are interpreted.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        info!(%timezone, "Using timezone for stored dates");
        self.timezone = timezone;
        self
    }

    /// Returns the timezone in which stored dates are interpreted.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Returns a store over this connection without opening a transaction.
    pub fn store(&mut self) -> Store<'_> {
        Store {
            conn: &mut self.conn,
            timezone: self.timezone,
        }
    }

    /// Runs `f` against a store inside an `IMMEDIATE` transaction.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back otherwise.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or an error if the transaction cannot be
    /// started or committed.
    pub fn consistent_read<T, F>(&mut self, f: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Store<'_>) -> Result<T, PersistenceError>,
    {
        let timezone: Tz = self.timezone;
        self.conn.immediate_transaction(|conn| {
            let mut store: Store<'_> = Store { conn, timezone };
            f(&mut store)
        })
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Retrieves an event by ID. See `Store::get_event`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_event(&mut self, event_id: i64) -> Result<Option<Event>, PersistenceError> {
        self.store().get_event(event_id)
    }

    /// Retrieves a buyable by ID. See `Store::get_buyable`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_buyable(&mut self, buyable_id: i64) -> Result<Option<Buyable>, PersistenceError> {
        self.store().get_buyable(buyable_id)
    }

    /// Lists the buyables of an event in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_buyables_for_event(
        &mut self,
        event_id: i64,
    ) -> Result<Vec<Buyable>, PersistenceError> {
        self.store().list_buyables_for_event(event_id)
    }

    /// Creates a new event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be stored.
    pub fn insert_event(&mut self, event: &Event) -> Result<Event, PersistenceError> {
        self.store().insert_event(event)
    }

    /// Creates a new buyable after validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the buyable cannot be stored.
    pub fn insert_buyable(&mut self, buyable: &Buyable) -> Result<Buyable, PersistenceError> {
        self.store().insert_buyable(buyable)
    }

    // ========================================================================
    // Reservations
    // ========================================================================

    /// Creates a reservation with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the reservation cannot be stored.
    pub fn insert_reservation(&mut self, status: ReservationStatus) -> Result<i64, PersistenceError> {
        self.store().insert_reservation(status)
    }

    /// Moves a reservation to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the reservation does not exist or the update fails.
    pub fn set_reservation_status(
        &mut self,
        reservation_id: i64,
        status: ReservationStatus,
    ) -> Result<(), PersistenceError> {
        self.store().set_reservation_status(reservation_id, status)
    }

    /// Adds an order item to a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be stored.
    pub fn insert_order_item(
        &mut self,
        reservation_id: i64,
        buyable_id: i64,
        amount: u32,
    ) -> Result<OrderItem, PersistenceError> {
        self.store()
            .insert_order_item(reservation_id, buyable_id, amount)
    }

    /// Adds an attendee to a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the attendee cannot be stored.
    pub fn insert_attendee(
        &mut self,
        reservation_id: i64,
        buyable_id: Option<i64>,
        ticket_status: TicketStatus,
    ) -> Result<Attendee, PersistenceError> {
        self.store()
            .insert_attendee(reservation_id, buyable_id, ticket_status)
    }

    /// Stores the attendees a purchase produced.
    ///
    /// # Errors
    ///
    /// Returns an error if any attendee cannot be stored.
    pub fn insert_attendees(
        &mut self,
        reservation_id: i64,
        drafts: &[AttendeeDraft],
    ) -> Result<Vec<Attendee>, PersistenceError> {
        self.store().insert_attendees(reservation_id, drafts)
    }
}

impl Store<'_> {
    /// Returns the timezone in which stored dates are interpreted.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Retrieves an event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the row is corrupt.
    /// Returns `Ok(None)` if the event is not found.
    pub fn get_event(&mut self, event_id: i64) -> Result<Option<Event>, PersistenceError> {
        queries::get_event(self.conn, &self.timezone, event_id)
    }

    /// Retrieves a buyable by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the row is corrupt.
    /// Returns `Ok(None)` if the buyable is not found.
    pub fn get_buyable(&mut self, buyable_id: i64) -> Result<Option<Buyable>, PersistenceError> {
        queries::get_buyable(self.conn, &self.timezone, buyable_id)
    }

    /// Lists the buyables of an event, by `sort_order` then latest sale start.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a row is corrupt.
    pub fn list_buyables_for_event(
        &mut self,
        event_id: i64,
    ) -> Result<Vec<Buyable>, PersistenceError> {
        queries::list_buyables_for_event(self.conn, &self.timezone, event_id)
    }

    /// Creates a new event and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be stored.
    pub fn insert_event(&mut self, event: &Event) -> Result<Event, PersistenceError> {
        mutations::insert_event(self.conn, &self.timezone, event)
    }

    /// Validates and creates a buyable, returning it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DomainViolation` if validation fails, or an
    /// error if the buyable cannot be stored.
    pub fn insert_buyable(&mut self, buyable: &Buyable) -> Result<Buyable, PersistenceError> {
        mutations::insert_buyable(self.conn, &self.timezone, buyable)
    }

    /// Creates a reservation with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the reservation cannot be stored.
    pub fn insert_reservation(&mut self, status: ReservationStatus) -> Result<i64, PersistenceError> {
        mutations::insert_reservation(self.conn, status)
    }

    /// Moves a reservation to a new status.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReservationNotFound` if the reservation does
    /// not exist.
    pub fn set_reservation_status(
        &mut self,
        reservation_id: i64,
        status: ReservationStatus,
    ) -> Result<(), PersistenceError> {
        mutations::set_reservation_status(self.conn, reservation_id, status)
    }

    /// Adds an order item to a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be stored.
    pub fn insert_order_item(
        &mut self,
        reservation_id: i64,
        buyable_id: i64,
        amount: u32,
    ) -> Result<OrderItem, PersistenceError> {
        mutations::insert_order_item(self.conn, reservation_id, buyable_id, amount)
    }

    /// Adds an attendee to a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the attendee cannot be stored.
    pub fn insert_attendee(
        &mut self,
        reservation_id: i64,
        buyable_id: Option<i64>,
        ticket_status: TicketStatus,
    ) -> Result<Attendee, PersistenceError> {
        mutations::insert_attendee(self.conn, reservation_id, buyable_id, ticket_status)
    }

    /// Stores the attendees a purchase produced.
    ///
    /// # Errors
    ///
    /// Returns an error if any attendee cannot be stored.
    pub fn insert_attendees(
        &mut self,
        reservation_id: i64,
        drafts: &[AttendeeDraft],
    ) -> Result<Vec<Attendee>, PersistenceError> {
        mutations::insert_attendees(self.conn, reservation_id, drafts)
    }
}

impl ReservationStore for Store<'_> {
    type Error = PersistenceError;

    fn order_items(&mut self, filter: &OrderItemFilter) -> Result<Vec<OrderItem>, Self::Error> {
        queries::list_order_items(self.conn, filter)
    }

    fn attendees(
        &mut self,
        reservation_id: i64,
        ticket_status: Option<TicketStatus>,
    ) -> Result<Vec<Attendee>, Self::Error> {
        queries::list_attendees(self.conn, reservation_id, ticket_status)
    }
}

impl ReservationStore for Persistence {
    type Error = PersistenceError;

    fn order_items(&mut self, filter: &OrderItemFilter) -> Result<Vec<OrderItem>, Self::Error> {
        queries::list_order_items(&mut self.conn, filter)
    }

    fn attendees(
        &mut self,
        reservation_id: i64,
        ticket_status: Option<TicketStatus>,
    ) -> Result<Vec<Attendee>, Self::Error> {
        queries::list_attendees(&mut self.conn, reservation_id, ticket_status)
    }
}
