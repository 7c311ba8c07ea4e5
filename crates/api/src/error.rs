// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use repair_desk::ReportError;
use repair_desk_domain::DomainError;
use repair_desk_persistence::PersistenceError;

use crate::outcome::FailureKind;
use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The session may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why it was refused.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: '{action}': {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The session may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why it was refused.
        reason: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// A collaborator (database, directory) failed.
    Upstream {
        /// The collaborator's own message, passed through unmodified.
        message: String,
    },
}

impl ApiError {
    /// The failure category reported to callers.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::AuthenticationFailed { .. } | Self::Unauthorized { .. } => {
                FailureKind::Unauthorized
            }
            Self::InvalidInput { .. } | Self::PasswordPolicyViolation { .. } => {
                FailureKind::Validation
            }
            Self::ResourceNotFound { .. } => FailureKind::NotFound,
            Self::Upstream { .. } => FailureKind::Upstream,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: '{action}': {reason}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Upstream { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized { action, reason } => Self::Unauthorized { action, reason },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::TechnicianNotFound(technician_id) => Self::ResourceNotFound {
                resource_type: String::from("Technician"),
                message: format!("Technician {technician_id} does not exist"),
            },
            ReportError::Store(store_error) => Self::Upstream {
                message: store_error.message().to_string(),
            },
            err @ ReportError::InvalidOrdering(_) => Self::InvalidInput {
                field: String::from("ordering"),
                message: err.to_string(),
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Validation(domain_error) => translate_domain_error(&domain_error),
            PersistenceError::AccountNotFound(message) => Self::ResourceNotFound {
                resource_type: String::from("Account"),
                message,
            },
            other => Self::Upstream {
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    let field: &str = match err {
        DomainError::InvalidOrderStatus { .. } => "status",
        DomainError::InvalidPhone(_) => "phone",
        DomainError::InvalidTechnicianName(_) => "name",
        DomainError::InvalidOrderNumber(_) => "order_number",
        DomainError::NegativeAmount { .. } => "amount_cents",
    };
    ApiError::InvalidInput {
        field: String::from(field),
        message: err.to_string(),
    }
}
