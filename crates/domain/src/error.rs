// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and configuration parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A relative date offset expression could not be parsed.
    InvalidRelativeOffset {
        /// The offending expression.
        expression: String,
        /// Why the expression was rejected.
        reason: String,
    },
    /// A catalog record breaks one of its invariants.
    InvariantViolation {
        /// The field that carries the invalid value.
        field: &'static str,
        /// Description of the violated rule.
        reason: String,
    },
    /// A stored capacity value is negative.
    InvalidCapacity(i64),
    /// A reservation status string is not part of the closed status set.
    InvalidReservationStatus(String),
    /// A ticket status string is not recognized.
    InvalidTicketStatus(String),
    /// A buyable kind string is not recognized.
    InvalidBuyableKind(String),
    /// Timezone identifier is not a valid IANA timezone.
    InvalidTimezone(String),
    /// Failed to parse a stored datetime.
    DateParseError {
        /// The invalid datetime string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A wall-clock time does not exist in the timezone (DST gap).
    NonExistentLocalTime {
        /// The wall-clock datetime.
        datetime: String,
        /// The timezone it was resolved in.
        timezone: String,
    },
    /// A requested purchase quantity falls outside the per-order bounds.
    OrderAmountOutOfRange {
        /// The requested amount.
        amount: u32,
        /// Minimum amount per order.
        min: u32,
        /// Maximum amount per order.
        max: u32,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRelativeOffset { expression, reason } => {
                write!(f, "Invalid relative offset '{expression}': {reason}")
            }
            Self::InvariantViolation { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
            Self::InvalidCapacity(value) => {
                write!(f, "Invalid capacity: {value}. Must not be negative")
            }
            Self::InvalidReservationStatus(status) => {
                write!(f, "Invalid reservation status: {status}")
            }
            Self::InvalidTicketStatus(status) => write!(f, "Invalid ticket status: {status}"),
            Self::InvalidBuyableKind(kind) => write!(f, "Invalid buyable kind: {kind}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse datetime '{date_string}': {error}")
            }
            Self::NonExistentLocalTime { datetime, timezone } => {
                write!(f, "Local time {datetime} does not exist in timezone {timezone}")
            }
            Self::OrderAmountOutOfRange { amount, min, max } => {
                write!(
                    f,
                    "Order amount {amount} is outside the allowed range {min}..={max}"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
