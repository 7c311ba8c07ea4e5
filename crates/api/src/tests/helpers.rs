// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use repair_desk::{OrderStore, StoreError, TechnicianDirectory};
use repair_desk_domain::{OrderStatus, Phone, ServiceOrder, Technician};
use repair_desk_persistence::{NewAccount, NewServiceOrder, Persistence};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::auth::{Role, Session};

pub const TEST_PASSWORD: &str = "Taller2026!";

/// Technician ids of the shop fixture.
pub struct Shop {
    /// Marta's first record.
    pub marta: i64,
    /// Marta's second record, same phone.
    pub marta_again: i64,
    pub luis: i64,
}

/// Three technician records (two of them one person) with a few orders.
pub fn create_test_shop(persistence: &mut Persistence) -> Shop {
    let marta = persistence
        .create_technician("Marta", Some("555-0101"))
        .unwrap();
    let marta_again = persistence
        .create_technician("Marta G.", Some("(555) 0101"))
        .unwrap();
    let luis = persistence
        .create_technician("Luis", Some("555-0202"))
        .unwrap();

    let orders = [
        ("OS-1", OrderStatus::Reparando, Some(marta), 0),
        ("OS-2", OrderStatus::GarantiaAplicada, Some(marta_again), 10),
        ("OS-3", OrderStatus::Completed, Some(luis), 20),
        ("OS-4", OrderStatus::Pending, None, 30),
    ];
    for (number, status, technician_id, minutes) in orders {
        persistence
            .create_service_order(&NewServiceOrder {
                order_number: number.to_string(),
                status,
                technician_id,
                client_id: 1,
                amount_cents: 5_000,
                created_at: datetime!(2026-01-05 09:00 UTC) + Duration::minutes(minutes),
            })
            .unwrap();
    }

    Shop {
        marta,
        marta_again,
        luis,
    }
}

/// Creates an account with [`TEST_PASSWORD`] already set.
pub fn create_test_account(
    persistence: &mut Persistence,
    login_name: &str,
    role: Role,
    technician_id: Option<i64>,
) -> i64 {
    let account_id = persistence
        .create_account(&NewAccount {
            login_name,
            display_name: login_name,
            role: role.as_str(),
            technician_id,
            setup_code: None,
        })
        .unwrap();
    persistence.set_password(account_id, TEST_PASSWORD).unwrap();
    account_id
}

pub fn admin_session() -> Session {
    Session {
        session_id: 1,
        account_id: 1,
        login_name: String::from("admin"),
        display_name: String::from("Admin"),
        role: Role::Admin,
        technician_id: None,
        expires_at: OffsetDateTime::now_utc() + Duration::days(1),
    }
}

pub fn technician_session(technician_id: i64) -> Session {
    Session {
        session_id: 2,
        account_id: 2,
        login_name: String::from("tecnico"),
        display_name: String::from("Tecnico"),
        role: Role::Technician,
        technician_id: Some(technician_id),
        expires_at: OffsetDateTime::now_utc() + Duration::days(1),
    }
}

/// A collaborator whose every call fails with the same message.
pub struct FailingStore {
    pub message: String,
}

impl FailingStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::new(self.message.clone()))
    }
}

impl OrderStore for FailingStore {
    fn fetch_orders(
        &mut self,
        _technician_id: Option<i64>,
    ) -> Result<Vec<ServiceOrder>, StoreError> {
        self.fail()
    }
}

impl TechnicianDirectory for FailingStore {
    fn get_technician(&mut self, _technician_id: i64) -> Result<Option<Technician>, StoreError> {
        self.fail()
    }

    fn resolve_by_phone(&mut self, _phone: &Phone) -> Result<Vec<i64>, StoreError> {
        self.fail()
    }

    fn list_technicians(&mut self) -> Result<Vec<Technician>, StoreError> {
        self.fail()
    }
}
