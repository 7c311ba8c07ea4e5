// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service order queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use repair_desk_domain::{OrderStatus, ServiceOrder};

use crate::diesel_schema::service_orders;
use crate::error::PersistenceError;
use crate::timestamp;

#[derive(Queryable, Selectable)]
#[diesel(table_name = service_orders)]
struct ServiceOrderRow {
    order_id: i64,
    order_number: String,
    status: String,
    technician_id: Option<i64>,
    client_id: i64,
    amount_cents: i64,
    created_at: String,
}

impl TryFrom<ServiceOrderRow> for ServiceOrder {
    type Error = PersistenceError;

    fn try_from(row: ServiceOrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e| {
            PersistenceError::InvalidData(format!("Order {}: {e}", row.order_id))
        })?;

        Ok(Self {
            id: row.order_id,
            order_number: row.order_number,
            status,
            technician_id: row.technician_id,
            created_at: timestamp::decode(&row.created_at)?,
            amount_cents: row.amount_cents,
            client_id: row.client_id,
        })
    }
}

/// Lists service orders, newest first, optionally for one technician record.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_service_orders(
    conn: &mut SqliteConnection,
    technician_id: Option<i64>,
) -> Result<Vec<ServiceOrder>, PersistenceError> {
    let mut query = service_orders::table
        .select(ServiceOrderRow::as_select())
        .order((
            service_orders::created_at.desc(),
            service_orders::order_id.desc(),
        ))
        .into_boxed();

    if let Some(technician_id) = technician_id {
        query = query.filter(service_orders::technician_id.eq(technician_id));
    }

    query
        .load::<ServiceOrderRow>(conn)?
        .into_iter()
        .map(ServiceOrder::try_from)
        .collect()
}
