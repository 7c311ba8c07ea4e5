// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Technician → status grouping of service orders.
//!
//! The grouping feeds an expandable report: one section per technician,
//! one sub-section per status. Both levels have a fixed order:
//!
//! - statuses follow [`repair_desk_domain::STATUS_PRECEDENCE`] and empty
//!   statuses are omitted;
//! - technicians follow the selected [`TechnicianOrdering`], with the
//!   Unassigned group always placed last.
//!
//! Orders inside a status bucket keep their input order.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use repair_desk_domain::{OrderStatus, ServiceOrder};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use crate::error::ReportError;

/// Display name of the group holding orders without a resolvable technician.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Ordering rule for technician groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechnicianOrdering {
    /// Case-insensitive name ascending; ties broken by the exact name.
    #[default]
    Alphabetical,
    /// Most recently created order first; ties broken alphabetically.
    RecentActivity,
}

impl TechnicianOrdering {
    /// Returns the configuration name of this ordering.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetical",
            Self::RecentActivity => "recent-activity",
        }
    }

    fn compare(self, a: &TechnicianGroup, b: &TechnicianGroup) -> Ordering {
        match (a.unassigned, b.unassigned) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        match self {
            Self::Alphabetical => compare_names(a, b),
            Self::RecentActivity => b
                .latest_activity
                .cmp(&a.latest_activity)
                .then_with(|| compare_names(a, b)),
        }
    }
}

fn compare_names(a: &TechnicianGroup, b: &TechnicianGroup) -> Ordering {
    a.technician
        .to_lowercase()
        .cmp(&b.technician.to_lowercase())
        .then_with(|| a.technician.cmp(&b.technician))
}

impl std::fmt::Display for TechnicianOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TechnicianOrdering {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alphabetical" => Ok(Self::Alphabetical),
            "recent-activity" => Ok(Self::RecentActivity),
            _ => Err(ReportError::InvalidOrdering(s.to_string())),
        }
    }
}

/// Orders sharing one status within a technician group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBucket {
    /// The shared status.
    pub status: OrderStatus,
    /// Orders with that status, in input order.
    pub orders: Vec<ServiceOrder>,
}

/// All orders attributed to one technician display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianGroup {
    /// Technician display name, or [`UNASSIGNED_LABEL`].
    pub technician: String,
    /// Whether this is the Unassigned group.
    pub unassigned: bool,
    /// Creation time of the newest order in the group.
    #[serde(with = "time::serde::rfc3339")]
    pub latest_activity: OffsetDateTime,
    /// Non-empty status buckets in precedence order.
    pub statuses: Vec<StatusBucket>,
}

impl TechnicianGroup {
    /// Number of orders across all status buckets.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.statuses.iter().map(|bucket| bucket.orders.len()).sum()
    }
}

struct GroupAccumulator {
    latest_activity: OffsetDateTime,
    buckets: BTreeMap<OrderStatus, Vec<ServiceOrder>>,
}

impl GroupAccumulator {
    fn new(order: &ServiceOrder) -> Self {
        let mut accumulator = Self {
            latest_activity: order.created_at,
            buckets: BTreeMap::new(),
        };
        accumulator.push(order);
        accumulator
    }

    fn push(&mut self, order: &ServiceOrder) {
        self.latest_activity = self.latest_activity.max(order.created_at);
        self.buckets
            .entry(order.status)
            .or_default()
            .push(order.clone());
    }
}

/// Groups orders by technician display name, then by status.
///
/// `resolver` maps a technician id to its display name. Orders without a
/// technician, or whose technician does not resolve to a non-blank name,
/// are placed in the [`UNASSIGNED_LABEL`] group.
///
/// Every input order appears in exactly one bucket of the result.
pub fn group_by_technician_and_status<R>(
    orders: &[ServiceOrder],
    resolver: R,
    ordering: TechnicianOrdering,
) -> Vec<TechnicianGroup>
where
    R: Fn(i64) -> Option<String>,
{
    let mut groups: HashMap<Option<String>, GroupAccumulator> = HashMap::new();

    for order in orders {
        let name: Option<String> = order.technician_id.and_then(|technician_id| {
            let resolved = resolver(technician_id).filter(|name| !name.trim().is_empty());
            if resolved.is_none() {
                debug!(
                    technician_id,
                    order_id = order.id,
                    "Technician name not resolved, grouping as unassigned"
                );
            }
            resolved
        });

        match groups.entry(name) {
            Entry::Occupied(mut entry) => entry.get_mut().push(order),
            Entry::Vacant(entry) => {
                entry.insert(GroupAccumulator::new(order));
            }
        }
    }

    let mut result: Vec<TechnicianGroup> = groups
        .into_iter()
        .map(|(name, accumulator)| TechnicianGroup {
            unassigned: name.is_none(),
            technician: name.unwrap_or_else(|| UNASSIGNED_LABEL.to_string()),
            latest_activity: accumulator.latest_activity,
            statuses: accumulator
                .buckets
                .into_iter()
                .map(|(status, orders)| StatusBucket { status, orders })
                .collect(),
        })
        .collect();

    result.sort_by(|a, b| ordering.compare(a, b));
    result
}
