// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A status string is not part of the service-order status enumeration.
    InvalidOrderStatus {
        /// The rejected status value.
        status: String,
    },
    /// A phone number contains no digits.
    InvalidPhone(String),
    /// Technician name is empty or invalid.
    InvalidTechnicianName(String),
    /// Order number is empty or invalid.
    InvalidOrderNumber(String),
    /// Monetary amount is negative.
    NegativeAmount {
        /// The rejected amount in minor units.
        amount_cents: i64,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrderStatus { status } => {
                write!(f, "Invalid service order status: '{status}'")
            }
            Self::InvalidPhone(msg) => write!(f, "Invalid phone: {msg}"),
            Self::InvalidTechnicianName(msg) => write!(f, "Invalid technician name: {msg}"),
            Self::InvalidOrderNumber(msg) => write!(f, "Invalid order number: {msg}"),
            Self::NegativeAmount { amount_cents } => {
                write!(f, "Order amount must not be negative, got {amount_cents}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
