// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod guard;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use repair_desk::TechnicianOrdering;
use repair_desk_api::{
    ApiError, CreateTechnicianAccountRequest, FailureKind, LoginRequest, LoginResponse,
    MessageResponse, MetricsQuery, Outcome, ProvisionedAccountResponse, SetPasswordRequest,
    TechnicianReportQuery, bootstrap_admin, create_technician_account, disable_account, login,
    logout, order_metrics, reissue_setup_code, set_password, technician_orders, technician_report,
    warranty_stats,
};
use repair_desk_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::{SESSION_COOKIE, SessionUser, extract_session_token};

/// Repair Desk Server - HTTP server for technician reports and the
/// technician portal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Default ordering of technician groups (`alphabetical` or `recent-activity`)
    #[arg(long, default_value = "alphabetical")]
    technician_ordering: TechnicianOrdering,

    /// Create the first admin account with this login name and log its
    /// setup code. Skipped once any account exists.
    #[arg(long, value_name = "LOGIN")]
    bootstrap_admin: Option<String>,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for orders, technicians and sessions.
    persistence: Arc<Mutex<Persistence>>,
    /// Group ordering used when a request does not pick one.
    technician_ordering: TechnicianOrdering,
    /// Whether the session cookie carries the `Secure` attribute.
    secure_cookies: bool,
}

/// Session cookie lifetime, matching the session expiration.
const SESSION_MAX_AGE_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Message returned in place of upstream failure details.
const UPSTREAM_MESSAGE: &str = "Upstream service failure";

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::Unauthorized { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::Upstream { .. } => {
                error!(error = %err, "Upstream failure");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from(UPSTREAM_MESSAGE),
                }
            }
        }
    }
}

/// Status code for a failed report call.
///
/// Sessions are checked before a report runs, so an unauthorized report
/// failure is always a refusal rather than a missing session.
const fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Unauthorized => StatusCode::FORBIDDEN,
        FailureKind::Validation => StatusCode::BAD_REQUEST,
        FailureKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Serializes a report outcome, hiding upstream failure details.
fn respond<T: Serialize>(outcome: Outcome<T>) -> Response {
    match outcome {
        Outcome::Success { .. } => (StatusCode::OK, Json(outcome)).into_response(),
        Outcome::Failure {
            kind: FailureKind::Upstream,
            ..
        } => {
            let hidden: Outcome<T> = Outcome::Failure {
                kind: FailureKind::Upstream,
                message: String::from(UPSTREAM_MESSAGE),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(hidden)).into_response()
        }
        Outcome::Failure { kind, .. } => (status_for(kind), Json(outcome)).into_response(),
    }
}

/// Builds the `Set-Cookie` value for a session token.
fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie: String = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Only a loopback bind may serve the session cookie over plain HTTP.
fn requires_secure_cookies(bind: &str) -> bool {
    !bind.parse::<IpAddr>().as_ref().is_ok_and(IpAddr::is_loopback)
}

/// Handler for POST `/api/auth/login`.
///
/// Returns the session in the body and as a cookie.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, HttpError> {
    info!(login_name = %req.login_name, "Handling login request");

    let response: LoginResponse = {
        let mut persistence = app_state.persistence.lock().await;
        login(&mut persistence, &req)?
    };

    let cookie: String = session_cookie(
        &response.session_token,
        SESSION_MAX_AGE_SECONDS,
        app_state.secure_cookies,
    );
    Ok(([(header::SET_COOKIE, cookie)], Json(response)).into_response())
}

/// Handler for POST `/api/auth/logout`.
///
/// Always clears the cookie, even without a session.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let response: MessageResponse = match extract_session_token(&headers) {
        Some(token) => {
            let mut persistence = app_state.persistence.lock().await;
            logout(&mut persistence, &token)?
        }
        None => MessageResponse {
            message: String::from("Signed out"),
        },
    };

    let cookie: String = session_cookie("", 0, app_state.secure_cookies);
    Ok(([(header::SET_COOKIE, cookie)], Json(response)).into_response())
}

/// Handler for POST `/api/auth/set-password`.
async fn handle_set_password(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SetPasswordRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling set password request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = set_password(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/api/reports/technicians`.
async fn handle_technician_report(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session): SessionUser,
    Query(query): Query<TechnicianReportQuery>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    let outcome = technician_report(
        &mut *persistence,
        &session,
        &query,
        app_state.technician_ordering,
    );
    drop(persistence);

    respond(outcome)
}

/// Handler for GET `/api/reports/metrics`.
async fn handle_order_metrics(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session): SessionUser,
    Query(query): Query<MetricsQuery>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    let outcome = order_metrics(&mut *persistence, &session, &query);
    drop(persistence);

    respond(outcome)
}

/// Handler for GET `/api/technicians/{technician_id}/warranty-stats`.
async fn handle_warranty_stats(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session): SessionUser,
    Path(technician_id): Path<i64>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    let outcome = warranty_stats(&mut *persistence, &session, technician_id);
    drop(persistence);

    respond(outcome)
}

/// Handler for GET `/tecnico/ordenes`.
///
/// The route guard only lets technician sessions through.
async fn handle_technician_orders(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session): SessionUser,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    let outcome = technician_orders(&mut *persistence, &session, app_state.technician_ordering);
    drop(persistence);

    respond(outcome)
}

/// Handler for POST `/api/accounts/technicians`.
async fn handle_create_technician_account(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session): SessionUser,
    Json(req): Json<CreateTechnicianAccountRequest>,
) -> Result<(StatusCode, Json<ProvisionedAccountResponse>), HttpError> {
    info!(login_name = %req.login_name, "Handling create technician account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ProvisionedAccountResponse =
        create_technician_account(&mut persistence, &session, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/api/accounts/{login_name}/setup-code`.
async fn handle_reissue_setup_code(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session): SessionUser,
    Path(login_name): Path<String>,
) -> Result<Json<ProvisionedAccountResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ProvisionedAccountResponse =
        reissue_setup_code(&mut persistence, &session, &login_name)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/api/accounts/{login_name}/disable`.
async fn handle_disable_account(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(session): SessionUser,
    Path(login_name): Path<String>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = disable_account(&mut persistence, &session, &login_name)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/tecnico/sign-in`.
async fn handle_sign_in_page() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: String::from("Sign in with POST /api/auth/login"),
    })
}

/// Handler for GET `/tecnico/set-password`.
async fn handle_set_password_page() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: String::from("Choose a password with POST /api/auth/set-password"),
    })
}

/// Fallback for unmatched paths that the guard lets through.
async fn handle_not_found() -> HttpError {
    HttpError {
        status: StatusCode::NOT_FOUND,
        message: String::from("Not found"),
    }
}

/// Builds the application router with all endpoints.
///
/// The route guard wraps every route and the fallback.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/logout", post(handle_logout))
        .route("/api/auth/set-password", post(handle_set_password))
        .route("/api/reports/technicians", get(handle_technician_report))
        .route("/api/reports/metrics", get(handle_order_metrics))
        .route(
            "/api/technicians/{technician_id}/warranty-stats",
            get(handle_warranty_stats),
        )
        .route("/api/accounts/technicians", post(handle_create_technician_account))
        .route("/api/accounts/{login_name}/setup-code", post(handle_reissue_setup_code))
        .route("/api/accounts/{login_name}/disable", post(handle_disable_account))
        .route("/tecnico/ordenes", get(handle_technician_orders))
        .route("/tecnico/sign-in", get(handle_sign_in_page))
        .route("/tecnico/set-password", get(handle_set_password_page))
        .fallback(handle_not_found)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            guard::route_guard,
        ))
        .with_state(app_state)
}

/// Creates the first admin account when the database has none.
///
/// An existing account is not an error; the request is logged and skipped.
fn run_bootstrap(persistence: &mut Persistence, login_name: &str) -> Result<(), ApiError> {
    match bootstrap_admin(persistence, login_name) {
        Ok(account) => {
            info!(
                login_name = %account.login_name,
                setup_code = %account.setup_code,
                "Admin account created; choose its password with POST /api/auth/set-password"
            );
            Ok(())
        }
        Err(err @ ApiError::Unauthorized { .. }) => {
            warn!(error = %err, "Skipping admin bootstrap");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Repair Desk Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    persistence.verify_foreign_key_enforcement()?;

    if let Some(login_name) = &args.bootstrap_admin {
        run_bootstrap(&mut persistence, login_name)?;
    }

    let purged: usize = persistence.delete_expired_sessions(OffsetDateTime::now_utc())?;
    info!(purged, "Removed expired sessions");

    info!(
        ordering = args.technician_ordering.as_str(),
        "Default technician ordering"
    );

    let secure_cookies: bool = requires_secure_cookies(&args.bind);
    if secure_cookies {
        info!(bind = %args.bind, "Session cookies are marked Secure");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        technician_ordering: args.technician_ordering,
        secure_cookies,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use repair_desk::UNASSIGNED_LABEL;
    use repair_desk_domain::OrderStatus;
    use repair_desk_persistence::{NewAccount, NewServiceOrder};
    use serde_json::Value;
    use time::Duration;
    use time::macros::datetime;
    use tower::ServiceExt;

    const TEST_PASSWORD: &str = "Taller2026!";
    const ADMIN_TOKEN: &str = "admin-token";
    const MARTA_TOKEN: &str = "marta-token";
    const LUIS_TOKEN: &str = "luis-token";

    /// Technician ids of the seeded shop.
    struct Shop {
        marta: i64,
        marta_again: i64,
        luis: i64,
    }

    fn create_account(
        persistence: &mut Persistence,
        login_name: &str,
        role: &str,
        technician_id: Option<i64>,
        token: &str,
    ) {
        let account_id: i64 = persistence
            .create_account(&NewAccount {
                login_name,
                display_name: login_name,
                role,
                technician_id,
                setup_code: None,
            })
            .unwrap();
        persistence
            .create_session(
                token,
                account_id,
                OffsetDateTime::now_utc() + Duration::days(1),
            )
            .unwrap();
    }

    /// Helper to create app state with two people, four orders, and a
    /// live session for an admin and for each technician.
    fn create_test_app_state() -> (AppState, Shop) {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");

        let marta: i64 = persistence
            .create_technician("Marta", Some("555-0101"))
            .unwrap();
        let marta_again: i64 = persistence
            .create_technician("Marta G.", Some("(555) 0101"))
            .unwrap();
        let luis: i64 = persistence
            .create_technician("Luis", Some("555-0202"))
            .unwrap();

        let orders = [
            ("OS-1", OrderStatus::Reparando, Some(marta), 0),
            ("OS-2", OrderStatus::GarantiaAplicada, Some(marta_again), 10),
            ("OS-3", OrderStatus::Completed, Some(luis), 20),
            ("OS-4", OrderStatus::Pending, None, 30),
        ];
        for (number, status, technician_id, minutes) in orders {
            persistence
                .create_service_order(&NewServiceOrder {
                    order_number: number.to_string(),
                    status,
                    technician_id,
                    client_id: 1,
                    amount_cents: 12_500,
                    created_at: datetime!(2026-02-02 10:00 UTC) + Duration::minutes(minutes),
                })
                .unwrap();
        }

        create_account(&mut persistence, "admin", "ADMIN", None, ADMIN_TOKEN);
        create_account(&mut persistence, "marta", "TECHNICIAN", Some(marta), MARTA_TOKEN);
        create_account(&mut persistence, "luis", "TECHNICIAN", Some(luis), LUIS_TOKEN);

        let app_state: AppState = AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            technician_ordering: TechnicianOrdering::Alphabetical,
            secure_cookies: false,
        };
        (
            app_state,
            Shop {
                marta,
                marta_again,
                luis,
            },
        )
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("cookie", format!("session_token={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get("location")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }

    fn group_labels(body: &Value) -> Vec<String> {
        body["data"]["groups"]
            .as_array()
            .unwrap()
            .iter()
            .map(|group| group["technician"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_outside_zone_redirects_to_sign_in_for_any_session() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        for token in [None, Some(MARTA_TOKEN), Some(ADMIN_TOKEN)] {
            let response = app.clone().oneshot(get("/clientes", token)).await.unwrap();

            assert_eq!(response.status(), HttpStatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/tecnico/sign-in");
        }
    }

    #[tokio::test]
    async fn test_signed_in_technician_is_sent_to_orders() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(get("/tecnico/sign-in", Some(MARTA_TOKEN)))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/tecnico/ordenes");
    }

    #[tokio::test]
    async fn test_orders_page_without_session_redirects() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app.oneshot(get("/tecnico/ordenes", None)).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/tecnico/sign-in");
    }

    #[tokio::test]
    async fn test_orders_page_with_expired_session_redirects() {
        let (app_state, _) = create_test_app_state();
        {
            let mut persistence = app_state.persistence.lock().await;
            let account_id: i64 = persistence
                .get_account_by_login("marta")
                .unwrap()
                .unwrap()
                .account_id;
            persistence
                .create_session(
                    "stale-token",
                    account_id,
                    OffsetDateTime::now_utc() - Duration::hours(1),
                )
                .unwrap();
        }
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(get("/tecnico/ordenes", Some("stale-token")))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/tecnico/sign-in");
    }

    #[tokio::test]
    async fn test_orders_page_shows_own_person_only() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(get("/tecnico/ordenes", Some(MARTA_TOKEN)))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: Value = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(group_labels(&body), vec!["Marta", "Marta G."]);
        assert_eq!(body["data"]["metrics"]["total"], 2);
    }

    #[tokio::test]
    async fn test_admin_session_cannot_open_technician_pages() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .clone()
            .oneshot(get("/tecnico/ordenes", Some(ADMIN_TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/tecnico/sign-in");

        let response = app
            .oneshot(get("/tecnico/sign-in", Some(ADMIN_TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_paths_bypass_guard() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app.oneshot(get("/api/reports/metrics", None)).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_opens_reports() {
        let (app_state, _) = create_test_app_state();
        {
            let mut persistence = app_state.persistence.lock().await;
            let account_id: i64 = persistence
                .get_account_by_login("admin")
                .unwrap()
                .unwrap()
                .account_id;
            persistence.set_password(account_id, TEST_PASSWORD).unwrap();
        }
        let app: Router = build_router(app_state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/login",
                &serde_json::json!({ "login_name": "Admin", "password": TEST_PASSWORD }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let cookie: String = response
            .headers()
            .get("set-cookie")
            .and_then(|value| value.to_str().ok())
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("session_token="));
        assert!(cookie.contains("HttpOnly"));

        let body: Value = body_json(response).await;
        assert_eq!(body["role"], "ADMIN");
        let token: String = body["session_token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/reports/technicians")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: Value = body_json(response).await;
        assert_eq!(body["data"]["ordering"], "alphabetical");
        assert_eq!(
            group_labels(&body),
            vec!["Luis", "Marta", "Marta G.", UNASSIGNED_LABEL]
        );
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                &serde_json::json!({ "login_name": "luis", "password": "wrong" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
        let body: Value = body_json(response).await;
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_set_password_then_login() {
        let (app_state, _) = create_test_app_state();
        {
            let mut persistence = app_state.persistence.lock().await;
            persistence
                .create_account(&NewAccount {
                    login_name: "nuevo",
                    display_name: "Nuevo",
                    role: "TECHNICIAN",
                    technician_id: None,
                    setup_code: Some("ABC123"),
                })
                .unwrap();
        }
        let app: Router = build_router(app_state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/set-password",
                &serde_json::json!({
                    "login_name": "nuevo",
                    "setup_code": "ABC123",
                    "password": TEST_PASSWORD,
                    "password_confirmation": TEST_PASSWORD,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                &serde_json::json!({ "login_name": "nuevo", "password": TEST_PASSWORD }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_set_password_rejects_weak_password() {
        let (app_state, _) = create_test_app_state();
        {
            let mut persistence = app_state.persistence.lock().await;
            persistence
                .create_account(&NewAccount {
                    login_name: "nuevo",
                    display_name: "Nuevo",
                    role: "TECHNICIAN",
                    technician_id: None,
                    setup_code: Some("ABC123"),
                })
                .unwrap();
        }
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(post_json(
                "/api/auth/set-password",
                &serde_json::json!({
                    "login_name": "nuevo",
                    "setup_code": "ABC123",
                    "password": "short",
                    "password_confirmation": "short",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .header("authorization", format!("Bearer {LUIS_TOKEN}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let cookie: &str = response
            .headers()
            .get("set-cookie")
            .and_then(|value| value.to_str().ok())
            .unwrap();
        assert!(cookie.contains("Max-Age=0"));

        let response = app
            .oneshot(get("/api/reports/metrics", Some(LUIS_TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_metrics_for_admin() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(get("/api/reports/metrics", Some(ADMIN_TOKEN)))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: Value = body_json(response).await;
        let metrics: &Value = &body["data"]["metrics"];
        assert_eq!(metrics["total"], 4);
        assert_eq!(metrics["completed"], 1);
        assert_eq!(metrics["pending"], 2);
        assert_eq!(metrics["cancelled"], 0);
    }

    #[tokio::test]
    async fn test_invalid_ordering_is_bad_request() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(get(
                "/api/reports/technicians?ordering=by-mood",
                Some(ADMIN_TOKEN),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
        let body: Value = body_json(response).await;
        assert_eq!(body["status"], "failure");
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_technician_cannot_read_another_persons_warranty_stats() {
        let (app_state, shop) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(get(
                &format!("/api/technicians/{}/warranty-stats", shop.marta),
                Some(LUIS_TOKEN),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
        let body: Value = body_json(response).await;
        assert_eq!(body["kind"], "unauthorized");
    }

    #[tokio::test]
    async fn test_technician_reads_warranty_stats_of_own_person() {
        let (app_state, shop) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(get(
                &format!("/api/technicians/{}/warranty-stats", shop.marta_again),
                Some(MARTA_TOKEN),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: Value = body_json(response).await;
        let stats: &Value = &body["data"]["stats"];
        assert_eq!(stats["phone"], "5550101");
        assert_eq!(stats["total"], 2);
        assert_eq!(stats["pending"], 1);
        assert_eq!(stats["warranty_applied"], 1);
    }

    #[tokio::test]
    async fn test_warranty_stats_for_unknown_technician_is_not_found() {
        let (app_state, shop) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(get(
                &format!("/api/technicians/{}/warranty-stats", shop.luis + 100),
                Some(ADMIN_TOKEN),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_details_are_hidden() {
        let outcome: Outcome<()> = Outcome::Failure {
            kind: FailureKind::Upstream,
            message: String::from("database is locked"),
        };

        let response: Response = respond(outcome);

        assert_eq!(response.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_args_default_ordering() {
        let args: Args = Args::parse_from(["repair-desk-server"]);

        assert_eq!(args.port, 3000);
        assert_eq!(args.bind, "127.0.0.1");
        assert_eq!(args.technician_ordering, TechnicianOrdering::Alphabetical);

        let args: Args =
            Args::parse_from(["repair-desk-server", "--technician-ordering", "recent-activity"]);
        assert_eq!(args.technician_ordering, TechnicianOrdering::RecentActivity);
        assert_eq!(args.bootstrap_admin, None);

        let args: Args =
            Args::parse_from(["repair-desk-server", "--bootstrap-admin", "encargado"]);
        assert_eq!(args.bootstrap_admin.as_deref(), Some("encargado"));
    }

    fn post_json_as(uri: &str, body: &Value, token: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    fn set_password_body(login_name: &str, setup_code: &str) -> Value {
        serde_json::json!({
            "login_name": login_name,
            "setup_code": setup_code,
            "password": TEST_PASSWORD,
            "password_confirmation": TEST_PASSWORD,
        })
    }

    #[tokio::test]
    async fn test_bootstrapped_admin_signs_in() {
        let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
        run_bootstrap(&mut persistence, "encargado").unwrap();
        run_bootstrap(&mut persistence, "otro").unwrap();

        assert_eq!(persistence.count_accounts().unwrap(), 1);
        let setup_code: String = persistence
            .get_account_by_login("encargado")
            .unwrap()
            .unwrap()
            .setup_code
            .unwrap();

        let app: Router = build_router(AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            technician_ordering: TechnicianOrdering::Alphabetical,
            secure_cookies: false,
        });

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/set-password",
                &set_password_body("encargado", &setup_code),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                &serde_json::json!({ "login_name": "encargado", "password": TEST_PASSWORD }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: Value = body_json(response).await;
        assert_eq!(body["role"], "ADMIN");
    }

    #[tokio::test]
    async fn test_admin_provisions_technician_who_reaches_orders() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .clone()
            .oneshot(post_json_as(
                "/api/accounts/technicians",
                &serde_json::json!({
                    "login_name": "nora",
                    "display_name": "Nora",
                    "phone": "555-0303",
                }),
                ADMIN_TOKEN,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);
        let body: Value = body_json(response).await;
        assert_eq!(body["role"], "TECHNICIAN");
        let setup_code: String = body["setup_code"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/set-password",
                &set_password_body("nora", &setup_code),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/login",
                &serde_json::json!({ "login_name": "nora", "password": TEST_PASSWORD }),
            ))
            .await
            .unwrap();
        let body: Value = body_json(response).await;
        let token: String = body["session_token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(get("/tecnico/ordenes", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: Value = body_json(response).await;
        assert_eq!(body["data"]["metrics"]["total"], 0);
    }

    #[tokio::test]
    async fn test_technician_cannot_create_accounts() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(post_json_as(
                "/api/accounts/technicians",
                &serde_json::json!({ "login_name": "nora", "display_name": "Nora" }),
                LUIS_TOKEN,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_disabled_account_loses_its_session() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .clone()
            .oneshot(post_json_as(
                "/api/accounts/luis/disable",
                &serde_json::json!({}),
                ADMIN_TOKEN,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(get("/api/reports/metrics", Some(LUIS_TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_reissue_setup_code_for_unknown_account_is_not_found() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(post_json_as(
                "/api/accounts/ghost/setup-code",
                &serde_json::json!({}),
                ADMIN_TOKEN,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_trailing_slash_redirects_to_canonical_page() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .clone()
            .oneshot(get("/tecnico/sign-in/", None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/tecnico/sign-in");

        let response = app
            .clone()
            .oneshot(get("/tecnico/ordenes/?ordering=recent-activity", Some(MARTA_TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/tecnico/ordenes?ordering=recent-activity");

        let response = app.oneshot(get("/tecnico/sign-in", None)).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[test]
    fn test_secure_cookie_unless_loopback() {
        assert!(!requires_secure_cookies("127.0.0.1"));
        assert!(!requires_secure_cookies("::1"));
        assert!(requires_secure_cookies("0.0.0.0"));
        assert!(requires_secure_cookies("192.168.1.20"));

        assert!(session_cookie("abc", 60, true).ends_with("; Secure"));
        assert!(!session_cookie("abc", 60, false).contains("Secure"));
    }

    #[tokio::test]
    async fn test_login_cookie_is_secure_when_configured() {
        let (mut app_state, _) = create_test_app_state();
        app_state.secure_cookies = true;
        {
            let mut persistence = app_state.persistence.lock().await;
            let account_id: i64 = persistence
                .get_account_by_login("luis")
                .unwrap()
                .unwrap()
                .account_id;
            persistence.set_password(account_id, TEST_PASSWORD).unwrap();
        }
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                &serde_json::json!({ "login_name": "luis", "password": TEST_PASSWORD }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let cookie: &str = response
            .headers()
            .get("set-cookie")
            .and_then(|value| value.to_str().ok())
            .unwrap();
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.ends_with("; Secure"));
    }
}
