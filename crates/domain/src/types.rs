// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::order_status::OrderStatus;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A normalized phone number.
///
/// Phone numbers identify a real person across technician records, so two
/// numbers that differ only in formatting must compare equal. Normalization
/// keeps digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone {
    digits: String,
}

impl Phone {
    /// Parses and normalizes a phone number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPhone` if the input contains no digits.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(DomainError::InvalidPhone(format!(
                "'{raw}' contains no digits"
            )));
        }
        Ok(Self { digits })
    }

    /// Normalizes an optional raw phone, treating blank or digit-free input
    /// as "no phone on file".
    #[must_use]
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| Self::parse(value).ok())
    }

    /// Returns the normalized digits.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl std::fmt::Display for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digits)
    }
}

/// A technician record.
///
/// Several records may describe the same person (re-onboarding, role
/// changes); they are tied together by their phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    /// Record identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Normalized phone, if one is on file.
    pub phone: Option<Phone>,
}

impl Technician {
    /// Creates a technician record.
    #[must_use]
    pub const fn new(id: i64, name: String, phone: Option<Phone>) -> Self {
        Self { id, name, phone }
    }
}

/// A unit of repair work tied to a client's appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOrder {
    /// Record identifier.
    pub id: i64,
    /// Human-facing order number.
    pub order_number: String,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Assigned technician record, if any.
    pub technician_id: Option<i64>,
    /// When the order was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Order amount in minor currency units.
    pub amount_cents: i64,
    /// Owning client.
    pub client_id: i64,
}
