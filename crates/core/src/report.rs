// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;

use repair_desk_domain::ServiceOrder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReportError;
use crate::grouping::{TechnicianGroup, TechnicianOrdering, group_by_technician_and_status};
use crate::metrics::{OrderMetrics, compute_metrics};
use crate::store::{OrderStore, TechnicianDirectory, fetch_orders_for_technicians};
use crate::warranty::resolve_technician_equivalence_class;

/// Which orders a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    /// Every order in the store.
    All,
    /// Orders of the person behind this technician record, across every
    /// record in its equivalence class.
    Technician(i64),
}

/// Metrics plus the technician → status grouping for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianReport {
    /// Summary card values.
    pub metrics: OrderMetrics,
    /// Ordering applied to `groups`.
    pub ordering: TechnicianOrdering,
    /// Technician groups.
    pub groups: Vec<TechnicianGroup>,
}

/// Returns the record ids whose orders belong to `technician_id`'s person.
///
/// Falls back to the single record when no phone is on file.
///
/// # Errors
///
/// Returns `ReportError::TechnicianNotFound` if the record does not exist,
/// or `ReportError::Store` if the directory fails.
pub fn scope_technician_ids<D>(
    directory: &mut D,
    technician_id: i64,
) -> Result<Vec<i64>, ReportError>
where
    D: TechnicianDirectory + ?Sized,
{
    Ok(resolve_technician_equivalence_class(directory, technician_id)?
        .map_or_else(|| vec![technician_id], |class| class.technician_ids))
}

/// Fetches the orders covered by `scope`.
///
/// A technician scope covers every record in the equivalence class.
///
/// # Errors
///
/// Returns `ReportError::TechnicianNotFound` for an unknown technician
/// scope, or `ReportError::Store` if a collaborator fails.
pub fn fetch_scope_orders<S>(
    source: &mut S,
    scope: ReportScope,
) -> Result<Vec<ServiceOrder>, ReportError>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    match scope {
        ReportScope::All => Ok(source.fetch_orders(None)?),
        ReportScope::Technician(technician_id) => {
            let technician_ids: Vec<i64> = scope_technician_ids(source, technician_id)?;
            Ok(fetch_orders_for_technicians(source, &technician_ids)?)
        }
    }
}

/// Fetches the orders in `scope` and aggregates them into a report.
///
/// # Errors
///
/// Returns `ReportError::TechnicianNotFound` for an unknown technician
/// scope, or `ReportError::Store` if a collaborator fails.
pub fn build_technician_report<S>(
    source: &mut S,
    scope: ReportScope,
    ordering: TechnicianOrdering,
) -> Result<TechnicianReport, ReportError>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    let orders: Vec<ServiceOrder> = fetch_scope_orders(source, scope)?;

    let names: HashMap<i64, String> = source
        .list_technicians()?
        .into_iter()
        .map(|technician| (technician.id, technician.name))
        .collect();

    let groups: Vec<TechnicianGroup> =
        group_by_technician_and_status(&orders, |id| names.get(&id).cloned(), ordering);

    debug!(
        ?scope,
        %ordering,
        orders = orders.len(),
        groups = groups.len(),
        "Built technician report"
    );

    Ok(TechnicianReport {
        metrics: compute_metrics(&orders),
        ordering,
        groups,
    })
}
