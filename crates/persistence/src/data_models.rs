// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use repair_desk_domain::OrderStatus;
use time::OffsetDateTime;

/// Input for creating a service order.
#[derive(Debug, Clone)]
pub struct NewServiceOrder {
    pub order_number: String,
    pub status: OrderStatus,
    pub technician_id: Option<i64>,
    pub client_id: i64,
    pub amount_cents: i64,
    pub created_at: OffsetDateTime,
}

/// Stored account data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountData {
    pub account_id: i64,
    pub login_name: String,
    pub display_name: String,
    /// `None` until the account holder has set a password.
    pub password_hash: Option<String>,
    /// One-time code that authorizes the first password setup.
    pub setup_code: Option<String>,
    pub role: String,
    /// Technician record this account signs in as, for TECHNICIAN accounts.
    pub technician_id: Option<i64>,
    pub is_disabled: bool,
    pub created_at: String,
    pub disabled_at: Option<String>,
    pub last_login_at: Option<String>,
}

/// Stored session data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub account_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}
