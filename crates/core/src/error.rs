// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Failure reported by an order store or technician directory.
///
/// The message is carried verbatim so callers can surface it unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Wraps a collaborator failure message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the original failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

/// Errors that can occur while building a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The referenced technician record does not exist.
    TechnicianNotFound(i64),
    /// A collaborator failed.
    Store(StoreError),
    /// A technician ordering name is not recognised.
    InvalidOrdering(String),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TechnicianNotFound(id) => write!(f, "Technician {id} not found"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidOrdering(value) => write!(
                f,
                "Unknown technician ordering '{value}'. Expected 'alphabetical' or 'recent-activity'"
            ),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<StoreError> for ReportError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
