// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report aggregator collaborators backed by the database.

use repair_desk::{OrderStore, StoreError, TechnicianDirectory};
use repair_desk_domain::{Phone, ServiceOrder, Technician};

use crate::Persistence;
use crate::error::PersistenceError;
use crate::queries;

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        Self::new(err.to_string())
    }
}

impl OrderStore for Persistence {
    fn fetch_orders(
        &mut self,
        technician_id: Option<i64>,
    ) -> Result<Vec<ServiceOrder>, StoreError> {
        Ok(queries::orders::list_service_orders(
            &mut self.conn,
            technician_id,
        )?)
    }
}

impl TechnicianDirectory for Persistence {
    fn get_technician(&mut self, technician_id: i64) -> Result<Option<Technician>, StoreError> {
        Ok(queries::technicians::get_technician(
            &mut self.conn,
            technician_id,
        )?)
    }

    fn resolve_by_phone(&mut self, phone: &Phone) -> Result<Vec<i64>, StoreError> {
        Ok(queries::technicians::find_technician_ids_by_phone(
            &mut self.conn,
            phone,
        )?)
    }

    fn list_technicians(&mut self) -> Result<Vec<Technician>, StoreError> {
        Ok(queries::technicians::list_technicians(&mut self.conn)?)
    }
}
