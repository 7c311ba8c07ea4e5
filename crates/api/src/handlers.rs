// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary functions.
//!
//! Report functions are generic over the report collaborators and return
//! an [`Outcome`]; they never panic and never reinterpret a collaborator
//! failure. Account functions work on the concrete persistence adapter.

use repair_desk::{
    OrderMetrics, OrderStore, ReportScope, TechnicianDirectory, TechnicianOrdering,
    TechnicianReport, WarrantyStats, build_technician_report, compute_metrics,
    compute_technician_warranty_stats, fetch_scope_orders,
};
use repair_desk_persistence::{AccountData, NewAccount, Persistence};
use time::format_description::well_known::Rfc3339;
use tracing::{debug, error, info};

use crate::auth::{AuthenticationService, AuthorizationService, Role, Session, generate_setup_code};
use crate::error::ApiError;
use crate::outcome::{FailureKind, Outcome};
use crate::request_response::{
    CreateTechnicianAccountRequest, LoginRequest, LoginResponse, MessageResponse, MetricsQuery,
    MetricsResponse, ProvisionedAccountResponse, SetPasswordRequest, TechnicianReportQuery,
    TechnicianReportResponse, WarrantyStatsResponse,
};

/// Logs a failed boundary call and wraps the result.
fn finish<T>(operation: &str, result: Result<T, ApiError>) -> Outcome<T> {
    if let Err(err) = &result {
        if err.kind() == FailureKind::Upstream {
            error!(operation, error = %err, "Upstream failure");
        } else {
            debug!(operation, error = %err, "Request refused");
        }
    }
    result.into()
}

/// Resolves which orders a session may see for an optional technician.
fn resolve_scope<S>(
    source: &mut S,
    session: &Session,
    technician_id: Option<i64>,
) -> Result<ReportScope, ApiError>
where
    S: TechnicianDirectory + ?Sized,
{
    match (technician_id, session.role) {
        (Some(technician_id), _) => {
            AuthorizationService::authorize_technician_access(source, session, technician_id)?;
            Ok(ReportScope::Technician(technician_id))
        }
        (None, Role::Technician) => Ok(ReportScope::Technician(
            AuthorizationService::own_technician_id(session)?,
        )),
        (None, Role::Admin) => {
            AuthorizationService::authorize_all_orders(session)?;
            Ok(ReportScope::All)
        }
    }
}

fn parse_ordering(
    requested: Option<&str>,
    default_ordering: TechnicianOrdering,
) -> Result<TechnicianOrdering, ApiError> {
    match requested.map(str::trim) {
        None | Some("") => Ok(default_ordering),
        Some(value) => Ok(value.parse::<TechnicianOrdering>()?),
    }
}

/// Builds the grouped technician report.
///
/// Admins see every order unless `technician_id` narrows the report.
/// Technicians see their own person, and may name any record of it.
pub fn technician_report<S>(
    source: &mut S,
    session: &Session,
    query: &TechnicianReportQuery,
    default_ordering: TechnicianOrdering,
) -> Outcome<TechnicianReportResponse>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    finish(
        "technician_report",
        try_technician_report(source, session, query, default_ordering),
    )
}

fn try_technician_report<S>(
    source: &mut S,
    session: &Session,
    query: &TechnicianReportQuery,
    default_ordering: TechnicianOrdering,
) -> Result<TechnicianReportResponse, ApiError>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    let ordering: TechnicianOrdering = parse_ordering(query.ordering.as_deref(), default_ordering)?;
    let scope: ReportScope = resolve_scope(source, session, query.technician_id)?;
    let report: TechnicianReport = build_technician_report(source, scope, ordering)?;

    Ok(TechnicianReportResponse {
        technician_id: query.technician_id,
        metrics: report.metrics,
        ordering: report.ordering,
        groups: report.groups,
    })
}

/// Report of the signed-in technician's own orders.
pub fn technician_orders<S>(
    source: &mut S,
    session: &Session,
    default_ordering: TechnicianOrdering,
) -> Outcome<TechnicianReportResponse>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    finish(
        "technician_orders",
        try_technician_orders(source, session, default_ordering),
    )
}

fn try_technician_orders<S>(
    source: &mut S,
    session: &Session,
    default_ordering: TechnicianOrdering,
) -> Result<TechnicianReportResponse, ApiError>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    let technician_id: i64 = AuthorizationService::own_technician_id(session)?;
    let report: TechnicianReport = build_technician_report(
        source,
        ReportScope::Technician(technician_id),
        default_ordering,
    )?;

    Ok(TechnicianReportResponse {
        technician_id: Some(technician_id),
        metrics: report.metrics,
        ordering: report.ordering,
        groups: report.groups,
    })
}

/// Computes the summary card values.
pub fn order_metrics<S>(
    source: &mut S,
    session: &Session,
    query: &MetricsQuery,
) -> Outcome<MetricsResponse>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    finish("order_metrics", try_order_metrics(source, session, query))
}

fn try_order_metrics<S>(
    source: &mut S,
    session: &Session,
    query: &MetricsQuery,
) -> Result<MetricsResponse, ApiError>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    let scope: ReportScope = resolve_scope(source, session, query.technician_id)?;
    let metrics: OrderMetrics = compute_metrics(&fetch_scope_orders(source, scope)?);

    Ok(MetricsResponse {
        technician_id: query.technician_id,
        metrics,
    })
}

/// Computes warranty statistics of the person behind `technician_id`.
pub fn warranty_stats<S>(
    source: &mut S,
    session: &Session,
    technician_id: i64,
) -> Outcome<WarrantyStatsResponse>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    finish(
        "warranty_stats",
        try_warranty_stats(source, session, technician_id),
    )
}

fn try_warranty_stats<S>(
    source: &mut S,
    session: &Session,
    technician_id: i64,
) -> Result<WarrantyStatsResponse, ApiError>
where
    S: OrderStore + TechnicianDirectory + ?Sized,
{
    AuthorizationService::authorize_technician_access(source, session, technician_id)?;
    let stats: Option<WarrantyStats> = compute_technician_warranty_stats(source, technician_id)?;

    Ok(WarrantyStatsResponse {
        technician_id,
        stats,
    })
}

/// Signs in and returns the new session token.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a blank login name, or
/// `ApiError::AuthenticationFailed` if the credentials are rejected.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    if request.login_name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("login_name"),
            message: String::from("Login name must not be empty"),
        });
    }

    let (session_token, session) =
        AuthenticationService::login(persistence, &request.login_name, &request.password)?;

    let expires_at: String = session
        .expires_at
        .format(&Rfc3339)
        .map_err(|e| ApiError::Upstream {
            message: format!("Failed to format session expiry: {e}"),
        })?;

    Ok(LoginResponse {
        session_token,
        login_name: session.login_name,
        display_name: session.display_name,
        role: session.role.as_str().to_string(),
        technician_id: session.technician_id,
        expires_at,
    })
}

/// Signs out. Unknown tokens are accepted.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(MessageResponse {
        message: String::from("Signed out"),
    })
}

/// Chooses a password by redeeming a setup code.
///
/// # Errors
///
/// Returns an error if the setup code is rejected or the password breaks
/// the password policy.
pub fn set_password(
    persistence: &mut Persistence,
    request: &SetPasswordRequest,
) -> Result<MessageResponse, ApiError> {
    AuthenticationService::set_password(
        persistence,
        &request.login_name,
        &request.setup_code,
        &request.password,
        &request.password_confirmation,
    )?;

    Ok(MessageResponse {
        message: String::from("Password set; you can now sign in"),
    })
}

// ========================================================================
// Account provisioning
// ========================================================================

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("{field} must not be empty"),
        });
    }
    Ok(trimmed)
}

fn find_account(
    persistence: &mut Persistence,
    login_name: &str,
) -> Result<AccountData, ApiError> {
    persistence
        .get_account_by_login(login_name)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Account"),
            message: format!("No account named '{}'", login_name.trim()),
        })
}

/// Creates the first admin account of an empty shop.
///
/// Only allowed while no account exists. The holder picks a password by
/// redeeming the returned setup code.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a blank login name, or
/// `ApiError::Unauthorized` once any account exists.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    login_name: &str,
) -> Result<ProvisionedAccountResponse, ApiError> {
    let login_name: &str = required("login_name", login_name)?;

    if persistence.count_accounts()? > 0 {
        return Err(ApiError::Unauthorized {
            action: String::from("bootstrap_admin"),
            reason: String::from("accounts already exist"),
        });
    }

    let setup_code: String = generate_setup_code();
    let account_id: i64 = persistence.create_account(&NewAccount {
        login_name,
        display_name: login_name,
        role: Role::Admin.as_str(),
        technician_id: None,
        setup_code: Some(&setup_code),
    })?;
    info!(account_id, "Bootstrapped admin account");

    Ok(ProvisionedAccountResponse {
        account_id,
        login_name: login_name.to_lowercase(),
        role: Role::Admin.as_str().to_string(),
        technician_id: None,
        setup_code,
    })
}

/// Creates a technician account, and its technician record when the
/// request does not name an existing one.
///
/// # Errors
///
/// Returns an error if the session is not an Admin, the login name is
/// blank or taken, the named technician does not exist, or the new
/// technician record is invalid.
pub fn create_technician_account(
    persistence: &mut Persistence,
    session: &Session,
    request: &CreateTechnicianAccountRequest,
) -> Result<ProvisionedAccountResponse, ApiError> {
    AuthorizationService::authorize_account_management(session)?;
    let login_name: &str = required("login_name", &request.login_name)?;
    let display_name: &str = required("display_name", &request.display_name)?;

    if persistence.get_account_by_login(login_name)?.is_some() {
        return Err(ApiError::InvalidInput {
            field: String::from("login_name"),
            message: format!("Login name '{login_name}' is already taken"),
        });
    }

    let technician_id: i64 = match request.technician_id {
        Some(technician_id) => {
            if persistence.get_technician(technician_id)?.is_none() {
                return Err(ApiError::ResourceNotFound {
                    resource_type: String::from("Technician"),
                    message: format!("Technician {technician_id} does not exist"),
                });
            }
            technician_id
        }
        None => persistence.create_technician(display_name, request.phone.as_deref())?,
    };

    let setup_code: String = generate_setup_code();
    let account_id: i64 = persistence.create_account(&NewAccount {
        login_name,
        display_name,
        role: Role::Technician.as_str(),
        technician_id: Some(technician_id),
        setup_code: Some(&setup_code),
    })?;
    info!(
        account_id,
        technician_id,
        created_by = session.account_id,
        "Created technician account"
    );

    Ok(ProvisionedAccountResponse {
        account_id,
        login_name: login_name.to_lowercase(),
        role: Role::Technician.as_str().to_string(),
        technician_id: Some(technician_id),
        setup_code,
    })
}

/// Issues a fresh setup code, letting the holder choose a new password.
///
/// # Errors
///
/// Returns an error if the session is not an Admin, or the account does
/// not exist or is disabled.
pub fn reissue_setup_code(
    persistence: &mut Persistence,
    session: &Session,
    login_name: &str,
) -> Result<ProvisionedAccountResponse, ApiError> {
    AuthorizationService::authorize_account_management(session)?;
    let account: AccountData = find_account(persistence, login_name)?;

    if account.is_disabled {
        return Err(ApiError::InvalidInput {
            field: String::from("login_name"),
            message: format!("Account '{}' is disabled", account.login_name),
        });
    }

    let setup_code: String = generate_setup_code();
    persistence.set_setup_code(account.account_id, &setup_code)?;
    info!(
        account_id = account.account_id,
        issued_by = session.account_id,
        "Issued setup code"
    );

    Ok(ProvisionedAccountResponse {
        account_id: account.account_id,
        login_name: account.login_name,
        role: account.role,
        technician_id: account.technician_id,
        setup_code,
    })
}

/// Disables an account and ends its sessions.
///
/// # Errors
///
/// Returns an error if the session is not an Admin, names its own account,
/// or the account does not exist.
pub fn disable_account(
    persistence: &mut Persistence,
    session: &Session,
    login_name: &str,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_account_management(session)?;
    let account: AccountData = find_account(persistence, login_name)?;

    if account.account_id == session.account_id {
        return Err(ApiError::InvalidInput {
            field: String::from("login_name"),
            message: String::from("An admin cannot disable its own account"),
        });
    }

    persistence.disable_account(account.account_id)?;
    info!(
        account_id = account.account_id,
        disabled_by = session.account_id,
        "Disabled account"
    );

    Ok(MessageResponse {
        message: format!("Account '{}' disabled", account.login_name),
    })
}
