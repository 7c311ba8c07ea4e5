// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test fixtures and an in-memory collaborator.

use repair_desk_domain::{OrderStatus, Phone, ServiceOrder, Technician};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{OrderStore, StoreError, TechnicianDirectory};

/// In-memory order store and technician directory.
#[derive(Default)]
pub struct InMemorySource {
    pub technicians: Vec<Technician>,
    pub orders: Vec<ServiceOrder>,
    /// When set, every call fails with this message.
    pub failure: Option<String>,
}

impl InMemorySource {
    pub fn new(technicians: Vec<Technician>, orders: Vec<ServiceOrder>) -> Self {
        Self {
            technicians,
            orders,
            failure: None,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        self.failure
            .as_ref()
            .map_or(Ok(()), |message| Err(StoreError::new(message.clone())))
    }
}

impl OrderStore for InMemorySource {
    fn fetch_orders(
        &mut self,
        technician_id: Option<i64>,
    ) -> Result<Vec<ServiceOrder>, StoreError> {
        self.check()?;
        Ok(self
            .orders
            .iter()
            .filter(|order| technician_id.is_none() || order.technician_id == technician_id)
            .cloned()
            .collect())
    }
}

impl TechnicianDirectory for InMemorySource {
    fn get_technician(&mut self, technician_id: i64) -> Result<Option<Technician>, StoreError> {
        self.check()?;
        Ok(self
            .technicians
            .iter()
            .find(|technician| technician.id == technician_id)
            .cloned())
    }

    fn resolve_by_phone(&mut self, phone: &Phone) -> Result<Vec<i64>, StoreError> {
        self.check()?;
        Ok(self
            .technicians
            .iter()
            .filter(|technician| technician.phone.as_ref() == Some(phone))
            .map(|technician| technician.id)
            .collect())
    }

    fn list_technicians(&mut self) -> Result<Vec<Technician>, StoreError> {
        self.check()?;
        Ok(self.technicians.clone())
    }
}

pub fn base_time() -> OffsetDateTime {
    datetime!(2026-01-05 09:00 UTC)
}

pub fn technician(id: i64, name: &str, phone: Option<&str>) -> Technician {
    Technician::new(id, name.to_string(), Phone::from_optional(phone))
}

/// Creates an order created `minutes` after [`base_time`].
pub fn order(
    id: i64,
    technician_id: Option<i64>,
    status: OrderStatus,
    minutes: i64,
) -> ServiceOrder {
    ServiceOrder {
        id,
        order_number: format!("OS-{id:04}"),
        status,
        technician_id,
        created_at: base_time() + Duration::minutes(minutes),
        amount_cents: 10_000,
        client_id: 1,
    }
}

pub fn names(technicians: &[Technician]) -> impl Fn(i64) -> Option<String> + '_ {
    move |id| {
        technicians
            .iter()
            .find(|technician| technician.id == id)
            .map(|technician| technician.name.clone())
    }
}
