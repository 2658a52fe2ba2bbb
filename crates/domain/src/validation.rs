// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::Buyable;
use rust_decimal::Decimal;

/// Validates that a buyable's field constraints are met.
///
/// This is the save-time check run by the authoring workflow. The
/// availability engine assumes buyables that passed it.
///
/// # Arguments
///
/// * `buyable` - The buyable to validate
///
/// # Errors
///
/// Returns `DomainError::InvariantViolation` if:
/// - The title is empty
/// - `order_min` is zero
/// - `order_max` is below `order_min`
/// - The price is negative
/// - Both explicit dates are set and the sale would end before it starts
pub fn validate_buyable(buyable: &Buyable) -> Result<(), DomainError> {
    // Rule: title must not be empty
    if buyable.title.trim().is_empty() {
        return Err(DomainError::InvariantViolation {
            field: "title",
            reason: String::from("Title cannot be empty"),
        });
    }

    // Rule: at least one unit per order
    if buyable.order_min < 1 {
        return Err(DomainError::InvariantViolation {
            field: "order_min",
            reason: String::from("Minimum per order must be at least 1"),
        });
    }

    // Rule: order_max >= order_min
    if buyable.order_max < buyable.order_min {
        return Err(DomainError::InvariantViolation {
            field: "order_max",
            reason: format!(
                "Maximum per order ({}) is below the minimum ({})",
                buyable.order_max, buyable.order_min
            ),
        });
    }

    // Rule: price is never negative
    if buyable.price < Decimal::ZERO {
        return Err(DomainError::InvariantViolation {
            field: "price",
            reason: format!("Price cannot be negative: {}", buyable.price),
        });
    }

    // Rule: explicit sale end is not before explicit sale start
    if let (Some(from), Some(till)) = (buyable.available_from, buyable.available_till)
        && till < from
    {
        return Err(DomainError::InvariantViolation {
            field: "available_till",
            reason: format!("Sale ends ({till}) before it starts ({from})"),
        });
    }

    Ok(())
}

/// Validates that a requested quantity respects the per-order bounds.
///
/// # Errors
///
/// Returns `DomainError::OrderAmountOutOfRange` if `amount` is outside
/// `order_min..=order_max`.
pub const fn validate_order_amount(buyable: &Buyable, amount: u32) -> Result<(), DomainError> {
    if amount < buyable.order_min || amount > buyable.order_max {
        return Err(DomainError::OrderAmountOutOfRange {
            amount,
            min: buyable.order_min,
            max: buyable.order_max,
        });
    }
    Ok(())
}
