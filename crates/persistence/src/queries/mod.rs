// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `catalog`: Events and buyables
//! - `reservations`: Order items and attendees, as read by the inventory aggregator

pub mod catalog;
pub mod reservations;

pub use catalog::{get_buyable, get_event, list_buyables_for_event};
pub use reservations::{list_attendees, list_order_items};
