// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Maximum accepted length for a technician display name.
const MAX_TECHNICIAN_NAME_LENGTH: usize = 120;

/// Validates a technician display name.
///
/// # Errors
///
/// Returns an error if the name is blank or longer than 120 characters.
pub fn validate_technician_name(name: &str) -> Result<(), DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidTechnicianName(String::from(
            "Name cannot be empty",
        )));
    }
    if trimmed.chars().count() > MAX_TECHNICIAN_NAME_LENGTH {
        return Err(DomainError::InvalidTechnicianName(format!(
            "Name cannot exceed {MAX_TECHNICIAN_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates a service order number.
///
/// # Errors
///
/// Returns an error if the order number is blank or contains whitespace.
pub fn validate_order_number(order_number: &str) -> Result<(), DomainError> {
    if order_number.is_empty() {
        return Err(DomainError::InvalidOrderNumber(String::from(
            "Order number cannot be empty",
        )));
    }
    if order_number.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidOrderNumber(format!(
            "'{order_number}' must not contain whitespace"
        )));
    }
    Ok(())
}

/// Validates a monetary amount expressed in minor units.
///
/// # Errors
///
/// Returns an error if the amount is negative.
pub const fn validate_amount_cents(amount_cents: i64) -> Result<(), DomainError> {
    if amount_cents < 0 {
        return Err(DomainError::NegativeAmount { amount_cents });
    }
    Ok(())
}
