// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator interfaces consumed by the report aggregator.

use std::collections::HashSet;

use repair_desk_domain::{Phone, ServiceOrder, Technician};

use crate::error::StoreError;

/// Read access to persisted service orders.
pub trait OrderStore {
    /// Fetches service orders, optionally restricted to one technician record.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn fetch_orders(
        &mut self,
        technician_id: Option<i64>,
    ) -> Result<Vec<ServiceOrder>, StoreError>;
}

/// Read access to technician records.
pub trait TechnicianDirectory {
    /// Looks up a technician by record id.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read. A missing record is
    /// `Ok(None)`.
    fn get_technician(&mut self, technician_id: i64) -> Result<Option<Technician>, StoreError>;

    /// Returns the ids of every technician record whose phone equals `phone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn resolve_by_phone(&mut self, phone: &Phone) -> Result<Vec<i64>, StoreError>;

    /// Returns every technician record.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list_technicians(&mut self) -> Result<Vec<Technician>, StoreError>;
}

/// Fetches the orders of several technician records as one collection.
///
/// Orders are de-duplicated by id and sorted newest first, ties by id
/// descending, so records of one person interleave chronologically.
///
/// # Errors
///
/// Returns the first store failure.
pub fn fetch_orders_for_technicians<S>(
    store: &mut S,
    technician_ids: &[i64],
) -> Result<Vec<ServiceOrder>, StoreError>
where
    S: OrderStore + ?Sized,
{
    let mut seen: HashSet<i64> = HashSet::new();
    let mut orders: Vec<ServiceOrder> = Vec::new();
    for technician_id in technician_ids {
        for order in store.fetch_orders(Some(*technician_id))? {
            if seen.insert(order.id) {
                orders.push(order);
            }
        }
    }
    orders.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    Ok(orders)
}
