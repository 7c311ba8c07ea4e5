// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-person warranty statistics.
//!
//! A real technician may be represented by several technician records that
//! share one phone number. Counting must always happen over that whole set
//! of records (the equivalence class), never over a single record id.

use repair_desk_domain::{Phone, ServiceOrder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReportError;
use crate::metrics::{OrderMetrics, compute_metrics};
use crate::store::{OrderStore, TechnicianDirectory, fetch_orders_for_technicians};

/// The technician records that represent one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianEquivalenceClass {
    /// The shared phone number.
    pub phone: Phone,
    /// Sorted, de-duplicated record ids sharing the phone.
    pub technician_ids: Vec<i64>,
}

impl TechnicianEquivalenceClass {
    /// Whether `technician_id` belongs to this class.
    #[must_use]
    pub fn contains(&self, technician_id: i64) -> bool {
        self.technician_ids.binary_search(&technician_id).is_ok()
    }
}

/// Warranty and workload counts for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyStats {
    /// The phone identifying the person.
    pub phone: Phone,
    /// Every record id that contributed.
    pub technician_ids: Vec<i64>,
    /// Orders assigned to any of the records.
    pub total: usize,
    /// Orders in COMPLETED or DELIVERED.
    pub completed: usize,
    /// Orders in PENDING, ASSIGNED or REPARANDO.
    pub pending: usize,
    /// Orders resolved under warranty.
    pub warranty_applied: usize,
}

/// Resolves every technician record sharing the phone of `technician_id`.
///
/// The returned class always contains `technician_id` itself.
///
/// # Returns
///
/// * `Ok(Some(class))` when the technician has a phone on file
/// * `Ok(None)` when it has no phone on file
///
/// # Errors
///
/// Returns `ReportError::TechnicianNotFound` if the record does not exist,
/// or `ReportError::Store` if the directory fails.
pub fn resolve_technician_equivalence_class<D>(
    directory: &mut D,
    technician_id: i64,
) -> Result<Option<TechnicianEquivalenceClass>, ReportError>
where
    D: TechnicianDirectory + ?Sized,
{
    let technician = directory
        .get_technician(technician_id)?
        .ok_or(ReportError::TechnicianNotFound(technician_id))?;

    let Some(phone) = technician.phone else {
        debug!(technician_id, "Technician has no phone on file");
        return Ok(None);
    };

    let mut technician_ids: Vec<i64> = directory.resolve_by_phone(&phone)?;
    technician_ids.push(technician_id);
    technician_ids.sort_unstable();
    technician_ids.dedup();

    debug!(
        technician_id,
        class_size = technician_ids.len(),
        "Resolved technician equivalence class"
    );

    Ok(Some(TechnicianEquivalenceClass {
        phone,
        technician_ids,
    }))
}

/// Computes warranty statistics over the equivalence class of a technician.
///
/// # Returns
///
/// * `Ok(Some(stats))` when the person has at least one assigned order
/// * `Ok(None)` when there is no phone on file or no assigned orders
///
/// # Errors
///
/// Returns `ReportError::TechnicianNotFound` if the record does not exist,
/// or `ReportError::Store` if a collaborator fails.
pub fn compute_technician_warranty_stats<S>(
    source: &mut S,
    technician_id: i64,
) -> Result<Option<WarrantyStats>, ReportError>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    let Some(class) = resolve_technician_equivalence_class(source, technician_id)? else {
        return Ok(None);
    };

    let orders: Vec<ServiceOrder> = fetch_orders_for_technicians(source, &class.technician_ids)?;
    if orders.is_empty() {
        debug!(technician_id, "No orders assigned to technician");
        return Ok(None);
    }

    let metrics: OrderMetrics = compute_metrics(&orders);
    let warranty_applied: usize = orders
        .iter()
        .filter(|order| order.status.is_warranty_applied())
        .count();

    Ok(Some(WarrantyStats {
        phone: class.phone,
        technician_ids: class.technician_ids,
        total: metrics.total,
        completed: metrics.completed,
        pending: metrics.pending,
        warranty_applied,
    }))
}
