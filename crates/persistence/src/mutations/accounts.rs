// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::connection::last_insert_rowid;
use crate::diesel_schema::{accounts, sessions};
use crate::error::PersistenceError;
use crate::timestamp;

/// Input for creating an account.
///
/// Accounts start without a password. The holder signs in for the first
/// time by redeeming `setup_code` through the set-password flow.
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub login_name: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
    pub technician_id: Option<i64>,
    pub setup_code: Option<&'a str>,
}

fn now_text() -> Result<String, PersistenceError> {
    timestamp::encode(OffsetDateTime::now_utc())
}

fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}

/// Creates an account and returns its id.
///
/// The `login_name` is normalized to lowercase for case-insensitive uniqueness.
///
/// # Errors
///
/// Returns an error if the login name already exists, the technician does
/// not exist, or the insert fails.
pub fn create_account(
    conn: &mut SqliteConnection,
    account: &NewAccount<'_>,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = account.login_name.trim().to_lowercase();
    if normalized_login.is_empty() {
        return Err(PersistenceError::Other(String::from(
            "Login name must not be empty",
        )));
    }

    info!(
        login_name = %normalized_login,
        role = account.role,
        technician_id = ?account.technician_id,
        "Creating account"
    );

    diesel::insert_into(accounts::table)
        .values((
            accounts::login_name.eq(&normalized_login),
            accounts::display_name.eq(account.display_name),
            accounts::role.eq(account.role),
            accounts::technician_id.eq(account.technician_id),
            accounts::setup_code.eq(account.setup_code),
            accounts::created_at.eq(now_text()?),
        ))
        .execute(conn)?;

    let account_id: i64 = last_insert_rowid(conn)?;
    info!(account_id, "Account created");

    Ok(account_id)
}

/// Hashes `password` and stores it, consuming any pending setup code.
///
/// # Errors
///
/// Returns `PersistenceError::AccountNotFound` if no row matched, or an
/// error if hashing or the update fails.
pub fn set_password(
    conn: &mut SqliteConnection,
    account_id: i64,
    password: &str,
) -> Result<(), PersistenceError> {
    let password_hash: String = hash_password(password)?;

    let rows_affected: usize = diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set((
            accounts::password_hash.eq(Some(password_hash)),
            accounts::setup_code.eq(None::<String>),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::AccountNotFound(format!(
            "Account with ID {account_id} not found"
        )));
    }

    info!(account_id, "Password set");
    Ok(())
}

/// Issues a new setup code, letting the holder choose a password again.
///
/// # Errors
///
/// Returns `PersistenceError::AccountNotFound` if no row matched, or an
/// error if the update fails.
pub fn set_setup_code(
    conn: &mut SqliteConnection,
    account_id: i64,
    setup_code: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::setup_code.eq(Some(setup_code)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::AccountNotFound(format!(
            "Account with ID {account_id} not found"
        )));
    }

    Ok(())
}

/// Records a successful sign-in.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut SqliteConnection, account_id: i64) -> Result<(), PersistenceError> {
    debug!(account_id, "Updating last_login_at");

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::last_login_at.eq(Some(now_text()?)))
        .execute(conn)?;

    Ok(())
}

/// Disables an account and drops its sessions.
///
/// # Errors
///
/// Returns `PersistenceError::AccountNotFound` if no row matched, or an
/// error if the database update fails.
pub fn disable_account(conn: &mut SqliteConnection, account_id: i64) -> Result<(), PersistenceError> {
    info!(account_id, "Disabling account");

    let disabled_at: String = now_text()?;
    conn.transaction(|conn| {
        let rows_affected: usize = diesel::update(accounts::table)
            .filter(accounts::account_id.eq(account_id))
            .set((
                accounts::is_disabled.eq(1),
                accounts::disabled_at.eq(Some(disabled_at.as_str())),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::AccountNotFound(format!(
                "Account with ID {account_id} not found"
            )));
        }

        diesel::delete(sessions::table)
            .filter(sessions::account_id.eq(account_id))
            .execute(conn)?;

        Ok(())
    })
}

/// Creates a session.
///
/// # Errors
///
/// Returns an error if the token already exists or the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    account_id: i64,
    expires_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let now: String = now_text()?;

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::account_id.eq(account_id),
            sessions::created_at.eq(&now),
            sessions::last_activity_at.eq(&now),
            sessions::expires_at.eq(timestamp::encode(expires_at)?),
        ))
        .execute(conn)?;

    let session_id: i64 = last_insert_rowid(conn)?;
    debug!(session_id, account_id, "Created session");

    Ok(session_id)
}

/// Touches the last activity timestamp of a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(now_text()?))
        .execute(conn)?;

    Ok(())
}

/// Deletes a session. Deleting an unknown token is not an error.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(conn: &mut SqliteConnection, session_token: &str) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    debug!(rows_affected, "Deleted session");
    Ok(())
}

/// Deletes every session whose expiry is before `now`.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let cutoff: String = timestamp::encode(now)?;
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(&cutoff))
        .execute(conn)?;

    if rows_affected > 0 {
        info!(rows_affected, "Deleted expired sessions");
    }
    Ok(rows_affected)
}
