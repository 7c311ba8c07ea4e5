// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Repair Desk.
//!
//! This crate stores technicians, service orders, accounts and sessions in
//! `SQLite` through Diesel, and exposes them to the report aggregator by
//! implementing its `OrderStore` and `TechnicianDirectory` traits.
//!
//! ## Storage
//!
//! - In-memory databases are used by unit and integration tests. Each call
//!   to [`Persistence::new_in_memory`] gets its own shared-cache database.
//! - File databases are opened in WAL mode with a busy timeout.
//!
//! Migrations are embedded at compile time and run on every open.
//!
//! ## Timestamps
//!
//! All timestamps are written as RFC 3339 UTC text with whole seconds, so
//! ordering in SQL matches chronological ordering.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use repair_desk_domain::{Phone, ServiceOrder, Technician};
use time::OffsetDateTime;

mod connection;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;
mod timestamp;

#[cfg(test)]
mod tests;

pub use connection::MIGRATIONS;
pub use data_models::{AccountData, NewServiceOrder, SessionData};
pub use error::PersistenceError;
pub use mutations::accounts::NewAccount;

use connection::StorageMode;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID so tests
/// never share a database.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter with a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_{db_id}?mode=memory&cache=shared");

        Ok(Self {
            conn: connection::open(&shared_memory_url, StorageMode::InMemory)?,
        })
    }

    /// Creates a persistence adapter backed by a database file.
    ///
    /// The file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the database
    /// cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        Ok(Self {
            conn: connection::open(path_str, StorageMode::File)?,
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        connection::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Technicians
    // ========================================================================

    /// Creates a technician and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or phone is invalid or the insert fails.
    pub fn create_technician(
        &mut self,
        name: &str,
        phone: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::technicians::insert_technician(&mut self.conn, name, phone)
    }

    /// Retrieves a technician by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_technician(
        &mut self,
        technician_id: i64,
    ) -> Result<Option<Technician>, PersistenceError> {
        queries::technicians::get_technician(&mut self.conn, technician_id)
    }

    /// Lists every technician ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_technicians(&mut self) -> Result<Vec<Technician>, PersistenceError> {
        queries::technicians::list_technicians(&mut self.conn)
    }

    /// Returns the ids of technicians sharing `phone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_technician_ids_by_phone(
        &mut self,
        phone: &Phone,
    ) -> Result<Vec<i64>, PersistenceError> {
        queries::technicians::find_technician_ids_by_phone(&mut self.conn, phone)
    }

    // ========================================================================
    // Service Orders
    // ========================================================================

    /// Creates a service order and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the insert fails.
    pub fn create_service_order(
        &mut self,
        order: &NewServiceOrder,
    ) -> Result<i64, PersistenceError> {
        mutations::orders::insert_service_order(&mut self.conn, order)
    }

    /// Lists service orders newest first, optionally for one technician.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_service_orders(
        &mut self,
        technician_id: Option<i64>,
    ) -> Result<Vec<ServiceOrder>, PersistenceError> {
        queries::orders::list_service_orders(&mut self.conn, technician_id)
    }

    // ========================================================================
    // Accounts & Sessions
    // ========================================================================

    /// Creates an account and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the login name is taken or the insert fails.
    pub fn create_account(&mut self, account: &NewAccount<'_>) -> Result<i64, PersistenceError> {
        mutations::accounts::create_account(&mut self.conn, account)
    }

    /// Retrieves an account by login name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_login(&mut self.conn, login_name)
    }

    /// Counts every account. Zero means the shop has not been bootstrapped.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_accounts(&mut self) -> Result<i64, PersistenceError> {
        queries::accounts::count_accounts(&mut self.conn)
    }

    /// Retrieves an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_id(
        &mut self,
        account_id: i64,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_id(&mut self.conn, account_id)
    }

    /// Hashes and stores a password, clearing the setup code.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the update fails.
    pub fn set_password(&mut self, account_id: i64, password: &str) -> Result<(), PersistenceError> {
        mutations::accounts::set_password(&mut self.conn, account_id, password)
    }

    /// Issues a new setup code for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the update fails.
    pub fn set_setup_code(
        &mut self,
        account_id: i64,
        setup_code: &str,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::set_setup_code(&mut self.conn, account_id, setup_code)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::accounts::verify_password(password, password_hash)
    }

    /// Records a successful sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, account_id: i64) -> Result<(), PersistenceError> {
        mutations::accounts::update_last_login(&mut self.conn, account_id)
    }

    /// Disables an account and deletes its sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the update fails.
    pub fn disable_account(&mut self, account_id: i64) -> Result<(), PersistenceError> {
        mutations::accounts::disable_account(&mut self.conn, account_id)
    }

    /// Creates a session and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        account_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::create_session(&mut self.conn, session_token, account_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::accounts::get_session_by_token(&mut self.conn, session_token)
    }

    /// Touches the last activity timestamp of a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::accounts::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::accounts::delete_session(&mut self.conn, session_token)
    }

    /// Deletes sessions that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now: OffsetDateTime) -> Result<usize, PersistenceError> {
        mutations::accounts::delete_expired_sessions(&mut self.conn, now)
    }
}
