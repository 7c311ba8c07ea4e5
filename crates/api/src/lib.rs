// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for Repair Desk.
//!
//! Sessions and authorization, the technician route guard, and the report
//! functions the HTTP server exposes. Nothing here knows about HTTP.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod outcome;
mod password_policy;
mod request_response;
mod route_guard;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticationService, AuthorizationService, Role, Session};
pub use error::{ApiError, AuthError, translate_domain_error};
pub use handlers::{
    bootstrap_admin, create_technician_account, disable_account, login, logout, order_metrics,
    reissue_setup_code, set_password, technician_orders, technician_report, warranty_stats,
};
pub use outcome::{FailureKind, Outcome};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    CreateTechnicianAccountRequest, LoginRequest, LoginResponse, MessageResponse, MetricsQuery,
    MetricsResponse, ProvisionedAccountResponse, SetPasswordRequest, TechnicianReportQuery,
    TechnicianReportResponse, WarrantyStatsResponse,
};
pub use route_guard::{
    EXCLUDED_PREFIXES, GuardDecision, ORDERS_PATH, PathClass, RouteGuard, SET_PASSWORD_PATH,
    SIGN_IN_PATH, TECHNICIAN_ZONE, canonical_path, classify_path, is_excluded,
};
