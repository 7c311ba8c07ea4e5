// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]


use repair_desk_domain::OrderStatus;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{NewServiceOrder, Persistence};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn base_time() -> OffsetDateTime {
    datetime!(2026-01-05 09:00 UTC)
}

pub fn new_order(
    order_number: &str,
    status: OrderStatus,
    technician_id: Option<i64>,
    minutes: i64,
) -> NewServiceOrder {
    NewServiceOrder {
        order_number: order_number.to_string(),
        status,
        technician_id,
        client_id: 1,
        amount_cents: 15_000,
        created_at: base_time() + time::Duration::minutes(minutes),
    }
}
