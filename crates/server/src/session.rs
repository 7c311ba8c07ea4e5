// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! A session token arrives either as the `session_token` cookie (browser
//! pages) or as an `Authorization: Bearer <token>` header (API clients).
//! The bearer header wins when both are present.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use repair_desk_api::{AuthenticationService, Session};
use tracing::{debug, warn};

use crate::AppState;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_token";

/// Reads the session token from the request headers.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Resolves the request's session, treating any failure as anonymous.
pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let token: String = extract_session_token(headers)?;
    let validated = {
        let mut persistence = state.persistence.lock().await;
        AuthenticationService::validate_session(&mut persistence, &token)
    };
    match validated {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(error = %e, "Ignoring invalid session");
            None
        }
    }
}

/// Extractor for a validated session.
///
/// Rejects the request with 401 when no token is sent or the token does
/// not resolve to a live session.
pub struct SessionUser(pub Session);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: String = extract_session_token(&parts.headers).ok_or_else(|| {
            debug!("Request carries no session token");
            SessionError::MissingToken
        })?;

        let validated = {
            let mut persistence = state.persistence.lock().await;
            AuthenticationService::validate_session(&mut persistence, &token)
        };
        let session: Session = validated.map_err(|e| {
            warn!(error = %e, "Session validation failed");
            SessionError::InvalidSession(e.to_string())
        })?;

        debug!(
            account_id = session.account_id,
            role = %session.role,
            "Session validated"
        );

        Ok(Self(session))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// No cookie and no bearer header.
    MissingToken,
    /// The token is unknown, expired, or its account is disabled.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingToken => String::from("Missing session token"),
            Self::InvalidSession(reason) => format!("Session validation failed: {reason}"),
        };

        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}
