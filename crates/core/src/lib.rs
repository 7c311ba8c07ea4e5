// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report aggregation for service orders.
//!
//! Everything in this crate is a pure computation over its inputs, apart
//! from the reads made through the [`OrderStore`] and
//! [`TechnicianDirectory`] collaborators. Collaborator failures are passed
//! through unchanged as [`ReportError::Store`].

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

mod error;
mod grouping;
mod metrics;
mod report;
mod store;
mod warranty;

#[cfg(test)]
mod tests;

pub use error::{ReportError, StoreError};
pub use grouping::{
    StatusBucket, TechnicianGroup, TechnicianOrdering, UNASSIGNED_LABEL,
    group_by_technician_and_status,
};
pub use metrics::{OrderMetrics, compute_metrics};
pub use report::{
    ReportScope, TechnicianReport, build_technician_report, fetch_scope_orders,
    scope_technician_ids,
};
pub use store::{OrderStore, TechnicianDirectory};
pub use warranty::{
    TechnicianEquivalenceClass, WarrantyStats, compute_technician_warranty_stats,
    resolve_technician_equivalence_class,
};
