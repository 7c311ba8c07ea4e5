// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response data transfer objects.

use repair_desk::{OrderMetrics, TechnicianGroup, TechnicianOrdering, WarrantyStats};
use serde::{Deserialize, Serialize};

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login_name: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Token to send back as the `session_token` cookie or a bearer token.
    pub session_token: String,
    pub login_name: String,
    pub display_name: String,
    /// `ADMIN` or `TECHNICIAN`.
    pub role: String,
    pub technician_id: Option<i64>,
    /// RFC 3339 expiry of the session.
    pub expires_at: String,
}

/// First-time password request for the set-password page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPasswordRequest {
    pub login_name: String,
    /// One-time code handed out by the shop.
    pub setup_code: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Query of the technician report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicianReportQuery {
    /// Restrict to one person, identified by any of its technician records.
    pub technician_id: Option<i64>,
    /// `alphabetical` or `recent-activity`; the server default when absent.
    pub ordering: Option<String>,
}

/// Grouped order report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianReportResponse {
    /// Requested technician, if the report is scoped.
    pub technician_id: Option<i64>,
    pub metrics: OrderMetrics,
    pub ordering: TechnicianOrdering,
    pub groups: Vec<TechnicianGroup>,
}

/// Query of the metrics endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsQuery {
    pub technician_id: Option<i64>,
}

/// Summary card values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub technician_id: Option<i64>,
    pub metrics: OrderMetrics,
}

/// Warranty statistics of one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyStatsResponse {
    pub technician_id: i64,
    /// `None` when the technician has no phone on file or no orders.
    pub stats: Option<WarrantyStats>,
}

/// Account creation request for a technician.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTechnicianAccountRequest {
    pub login_name: String,
    pub display_name: String,
    /// Existing technician record to sign in as. When absent a new record
    /// named `display_name` is created.
    pub technician_id: Option<i64>,
    /// Phone of the new technician record; ignored with `technician_id`.
    pub phone: Option<String>,
}

/// An account waiting for its holder to redeem the setup code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedAccountResponse {
    pub account_id: i64,
    pub login_name: String,
    /// `ADMIN` or `TECHNICIAN`.
    pub role: String,
    pub technician_id: Option<i64>,
    /// One-time code for `POST /api/auth/set-password`.
    pub setup_code: String,
}
