// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Technician queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use repair_desk_domain::{Phone, Technician};
use tracing::debug;

use crate::diesel_schema::technicians;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = technicians)]
struct TechnicianRow {
    technician_id: i64,
    name: String,
    phone: Option<String>,
}

impl From<TechnicianRow> for Technician {
    fn from(row: TechnicianRow) -> Self {
        Self::new(
            row.technician_id,
            row.name,
            Phone::from_optional(row.phone.as_deref()),
        )
    }
}

/// Retrieves a technician by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the technician is not found.
pub fn get_technician(
    conn: &mut SqliteConnection,
    technician_id: i64,
) -> Result<Option<Technician>, PersistenceError> {
    debug!(technician_id, "Looking up technician");

    let row: Option<TechnicianRow> = technicians::table
        .filter(technicians::technician_id.eq(technician_id))
        .select(TechnicianRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Technician::from))
}

/// Lists every technician, ordered by name then id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_technicians(conn: &mut SqliteConnection) -> Result<Vec<Technician>, PersistenceError> {
    let rows: Vec<TechnicianRow> = technicians::table
        .order((technicians::name.asc(), technicians::technician_id.asc()))
        .select(TechnicianRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Technician::from).collect())
}

/// Returns the ids of technicians whose stored phone equals `phone`.
///
/// Phones are stored normalized, so this is an exact match.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_technician_ids_by_phone(
    conn: &mut SqliteConnection,
    phone: &Phone,
) -> Result<Vec<i64>, PersistenceError> {
    debug!(phone = %phone, "Resolving technicians by phone");

    Ok(technicians::table
        .filter(technicians::phone.eq(phone.digits()))
        .order(technicians::technician_id.asc())
        .select(technicians::technician_id)
        .load(conn)?)
}
