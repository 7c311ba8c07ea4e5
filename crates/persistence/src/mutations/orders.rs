// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service order mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use repair_desk_domain::{validate_amount_cents, validate_order_number};
use time::OffsetDateTime;
use tracing::info;

use crate::connection::last_insert_rowid;
use crate::data_models::NewServiceOrder;
use crate::diesel_schema::service_orders;
use crate::error::PersistenceError;
use crate::timestamp;

/// Inserts a service order and returns its id.
///
/// # Errors
///
/// Returns an error if the order number or amount is invalid, the
/// technician does not exist, or the insert fails.
pub fn insert_service_order(
    conn: &mut SqliteConnection,
    order: &NewServiceOrder,
) -> Result<i64, PersistenceError> {
    validate_order_number(&order.order_number)?;
    validate_amount_cents(order.amount_cents)?;

    let created_at: String = timestamp::encode(order.created_at)?;
    let updated_at: String = timestamp::encode(OffsetDateTime::now_utc())?;

    diesel::insert_into(service_orders::table)
        .values((
            service_orders::order_number.eq(order.order_number.trim()),
            service_orders::status.eq(order.status.as_str()),
            service_orders::technician_id.eq(order.technician_id),
            service_orders::client_id.eq(order.client_id),
            service_orders::amount_cents.eq(order.amount_cents),
            service_orders::created_at.eq(&created_at),
            service_orders::updated_at.eq(&updated_at),
        ))
        .execute(conn)?;

    let order_id: i64 = last_insert_rowid(conn)?;
    info!(
        order_id,
        order_number = %order.order_number,
        status = %order.status,
        "Created service order"
    );

    Ok(order_id)
}
