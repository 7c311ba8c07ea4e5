// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp text encoding.
//!
//! Order timestamps are stored as RFC 3339 text in UTC with whole seconds,
//! so lexical order in SQL matches chronological order.

use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::error::PersistenceError;

/// Encodes a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn encode(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .replace_nanosecond(0)
        .map_err(|e| PersistenceError::InvalidData(e.to_string()))?
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::InvalidData(format!("Failed to format timestamp: {e}")))
}

/// Decodes a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn decode(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::InvalidData(format!("Bad timestamp '{value}': {e}")))
}
