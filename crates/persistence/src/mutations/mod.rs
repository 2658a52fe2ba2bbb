// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules for persistence layer.
//!
//! Catalog rows are written by the authoring workflow and reservation rows
//! by the checkout workflow. Both live outside this workspace; these
//! helpers are their write path and the fixture path for tests.

pub mod catalog;
pub mod reservations;

pub use catalog::{insert_buyable, insert_event};
pub use reservations::{
    insert_attendee, insert_attendees, insert_order_item, insert_reservation,
    set_reservation_status,
};
