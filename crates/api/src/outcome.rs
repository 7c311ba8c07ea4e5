// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tagged result shape returned by every report boundary function.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Failure categories visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A referenced entity does not exist.
    NotFound,
    /// No valid session, or the session may not see this data.
    Unauthorized,
    /// Missing or malformed input.
    Validation,
    /// A store or directory failed.
    Upstream,
}

/// Either the requested data or a categorized failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Success { data: T },
    Failure { kind: FailureKind, message: String },
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure kind, if this is a failure.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Converts back into a `Result`, keeping the kind and message.
    ///
    /// # Errors
    ///
    /// Returns `(kind, message)` for a failure.
    pub fn into_result(self) -> Result<T, (FailureKind, String)> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { kind, message } => Err((kind, message)),
        }
    }
}

impl<T> From<Result<T, ApiError>> for Outcome<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(err) => Self::Failure {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}
