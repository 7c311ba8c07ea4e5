// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route guard middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use repair_desk_api::{GuardDecision, RouteGuard, Session, canonical_path, is_excluded};
use tracing::{debug, warn};

use crate::AppState;
use crate::session::resolve_session;

/// Applies the technician route guard to every non-excluded request.
///
/// Redirects are `303 See Other`. A canonical-path redirect keeps the
/// query string.
pub async fn route_guard(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path: String = req.uri().path().to_string();
    if is_excluded(&path) {
        return next.run(req).await;
    }

    let session: Option<Session> = resolve_session(&state, req.headers()).await;

    match RouteGuard::evaluate(&path, session.as_ref()) {
        GuardDecision::Allow => next.run(req).await,
        GuardDecision::Redirect(target) => {
            warn!(path = %path, target, "Route guard redirect");
            Redirect::to(target).into_response()
        }
        GuardDecision::RedirectCanonical => {
            let canonical: &str = canonical_path(&path);
            let target: String = req.uri().query().map_or_else(
                || canonical.to_string(),
                |query| format!("{canonical}?{query}"),
            );
            debug!(path = %path, target = %target, "Redirect to canonical path");
            Redirect::to(&target).into_response()
        }
    }
}
