// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use repair_desk_domain::{Phone, validate_technician_name};
use time::OffsetDateTime;
use tracing::info;

use crate::connection::last_insert_rowid;
use crate::diesel_schema::technicians;
use crate::error::PersistenceError;
use crate::timestamp;

/// Creates a technician record.
///
/// The phone, when given, is stored in normalized digit-only form so that
/// equivalence lookups are exact matches.
///
/// # Errors
///
/// Returns an error if the name or phone is invalid, or the insert fails.
pub fn insert_technician(
    conn: &mut SqliteConnection,
    name: &str,
    phone: Option<&str>,
) -> Result<i64, PersistenceError> {
    validate_technician_name(name)?;
    let phone: Option<Phone> = phone.map(Phone::parse).transpose()?;
    let created_at: String = timestamp::encode(OffsetDateTime::now_utc())?;

    diesel::insert_into(technicians::table)
        .values((
            technicians::name.eq(name.trim()),
            technicians::phone.eq(phone.as_ref().map(Phone::digits)),
            technicians::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    let technician_id: i64 = last_insert_rowid(conn)?;
    info!(technician_id, name = name.trim(), "Created technician");

    Ok(technician_id)
}
