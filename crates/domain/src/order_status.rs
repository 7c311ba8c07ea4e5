// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service-order status enumeration and its display precedence.
//!
//! The precedence list is the order in which statuses are presented in
//! every report. Sorting an `OrderStatus` collection always yields this
//! order.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Lifecycle status of a service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order received, not yet assigned.
    Pending,
    /// A technician has been assigned.
    Assigned,
    /// A quote has been issued to the client.
    Presupuestado,
    /// The appliance is being repaired.
    Reparando,
    /// Repair finished, client still has to be notified.
    PendienteAvisar,
    /// The order has been invoiced.
    Facturado,
    /// The client approved the quote.
    Aprobado,
    /// Work completed.
    Completed,
    /// Appliance handed back to the client.
    Delivered,
    /// The repair was covered by a warranty claim.
    GarantiaAplicada,
    /// The client rejected the quote.
    NoAprobado,
    /// Order cancelled.
    Cancelled,
    /// Pre-registered order awaiting intake.
    Preorder,
}

/// Fixed display order for statuses.
pub const STATUS_PRECEDENCE: [OrderStatus; 13] = [
    OrderStatus::Pending,
    OrderStatus::Assigned,
    OrderStatus::Presupuestado,
    OrderStatus::Reparando,
    OrderStatus::PendienteAvisar,
    OrderStatus::Facturado,
    OrderStatus::Aprobado,
    OrderStatus::Completed,
    OrderStatus::Delivered,
    OrderStatus::GarantiaAplicada,
    OrderStatus::NoAprobado,
    OrderStatus::Cancelled,
    OrderStatus::Preorder,
];

impl OrderStatus {
    /// Returns the storage and wire representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Assigned => "ASSIGNED",
            Self::Presupuestado => "PRESUPUESTADO",
            Self::Reparando => "REPARANDO",
            Self::PendienteAvisar => "PENDIENTE_AVISAR",
            Self::Facturado => "FACTURADO",
            Self::Aprobado => "APROBADO",
            Self::Completed => "COMPLETED",
            Self::Delivered => "DELIVERED",
            Self::GarantiaAplicada => "GARANTIA_APLICADA",
            Self::NoAprobado => "NO_APROBADO",
            Self::Cancelled => "CANCELLED",
            Self::Preorder => "PREORDER",
        }
    }

    /// Position of this status in [`STATUS_PRECEDENCE`].
    #[must_use]
    pub const fn precedence(&self) -> usize {
        match self {
            Self::Pending => 0,
            Self::Assigned => 1,
            Self::Presupuestado => 2,
            Self::Reparando => 3,
            Self::PendienteAvisar => 4,
            Self::Facturado => 5,
            Self::Aprobado => 6,
            Self::Completed => 7,
            Self::Delivered => 8,
            Self::GarantiaAplicada => 9,
            Self::NoAprobado => 10,
            Self::Cancelled => 11,
            Self::Preorder => 12,
        }
    }

    /// Work on the order is finished and counted as completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed | Self::Delivered)
    }

    /// The order is still waiting for, or undergoing, work.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending | Self::Assigned | Self::Reparando)
    }

    /// The order was cancelled or its quote rejected.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::NoAprobado)
    }

    /// The repair was resolved under warranty.
    #[must_use]
    pub const fn is_warranty_applied(&self) -> bool {
        matches!(self, Self::GarantiaAplicada)
    }
}

impl Ord for OrderStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence().cmp(&other.precedence())
    }
}

impl PartialOrd for OrderStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATUS_PRECEDENCE
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidOrderStatus {
                status: s.to_string(),
            })
    }
}
