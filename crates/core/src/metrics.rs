// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use repair_desk_domain::ServiceOrder;
use serde::{Deserialize, Serialize};

/// Summary card values for a collection of service orders.
///
/// `completed`, `pending` and `cancelled` count disjoint status subsets, so
/// their sum never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderMetrics {
    /// Number of orders.
    pub total: usize,
    /// Orders in COMPLETED or DELIVERED.
    pub completed: usize,
    /// Orders in PENDING, ASSIGNED or REPARANDO.
    pub pending: usize,
    /// Orders in CANCELLED or NO_APROBADO.
    pub cancelled: usize,
}

impl OrderMetrics {
    /// Orders outside the three named subsets.
    #[must_use]
    pub const fn other(&self) -> usize {
        self.total - self.completed - self.pending - self.cancelled
    }
}

/// Computes the four summary metrics. An empty input yields all zeros.
#[must_use]
pub fn compute_metrics(orders: &[ServiceOrder]) -> OrderMetrics {
    orders
        .iter()
        .fold(OrderMetrics::default(), |mut metrics, order| {
            metrics.total += 1;
            if order.status.is_completed() {
                metrics.completed += 1;
            } else if order.status.is_pending() {
                metrics.pending += 1;
            } else if order.status.is_cancelled() {
                metrics.cancelled += 1;
            }
            metrics
        })
}
