// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request path guard for the technician portal.
//!
//! The portal is technician-first: every page lives under `/tecnico`, and
//! any other page path is sent to the technician sign-in page. Inside the
//! zone, the sign-in and set-password pages are public and everything else
//! needs a technician session.
//!
//! The guard is a pure function of the request path and the resolved
//! session. It never touches storage.

use crate::auth::Session;

/// Root of the technician zone.
pub const TECHNICIAN_ZONE: &str = "/tecnico";
/// Technician sign-in page.
pub const SIGN_IN_PATH: &str = "/tecnico/sign-in";
/// First-time password page.
pub const SET_PASSWORD_PATH: &str = "/tecnico/set-password";
/// Landing page for signed-in technicians.
pub const ORDERS_PATH: &str = "/tecnico/ordenes";

/// Path prefixes the guard never inspects.
///
/// Besides the API and the framework asset prefixes, `static` covers
/// assets served by this server from its own `/static` directory.
pub const EXCLUDED_PREFIXES: [&str; 5] =
    ["api", "_next/static", "_next/image", "favicon.ico", "static"];

const PUBLIC_PATHS: [&str; 2] = [SIGN_IN_PATH, SET_PASSWORD_PATH];

/// Where a path sits relative to the technician zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Matches an excluded prefix; the guard does not apply.
    Excluded,
    /// Sign-in or set-password, or below them.
    TechnicianPublic,
    /// Any other path in the zone.
    TechnicianProtected,
    /// Not in the zone.
    OutsideZone,
}

/// What to do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Pass the request through unchanged.
    Allow,
    /// Redirect to the given path.
    Redirect(&'static str),
    /// Redirect to the same path without its trailing slash.
    RedirectCanonical,
}

/// Whether `path` equals `prefix` or lies below it, by whole segments.
fn within(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Strips one trailing slash, keeping `/` itself.
#[must_use]
pub fn canonical_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Whether the guard skips `path` entirely.
#[must_use]
pub fn is_excluded(path: &str) -> bool {
    let relative: &str = path.trim_start_matches('/');
    EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| within(relative, prefix))
}

/// Classifies a request path.
#[must_use]
pub fn classify_path(path: &str) -> PathClass {
    if is_excluded(path) {
        return PathClass::Excluded;
    }

    let path: &str = canonical_path(path);
    if PUBLIC_PATHS.iter().any(|public| within(path, public)) {
        PathClass::TechnicianPublic
    } else if within(path, TECHNICIAN_ZONE) {
        PathClass::TechnicianProtected
    } else {
        PathClass::OutsideZone
    }
}

/// Guard for the technician portal.
pub struct RouteGuard;

impl RouteGuard {
    /// Decides whether a request may proceed.
    ///
    /// Only a session with the technician role counts as signed in here.
    /// A zone path that would be allowed but ends in a slash is sent to its
    /// canonical form, since routes are registered without the slash.
    #[must_use]
    pub fn evaluate(path: &str, session: Option<&Session>) -> GuardDecision {
        let signed_in: bool = session.is_some_and(Session::is_technician);
        let allow: GuardDecision = if canonical_path(path) == path {
            GuardDecision::Allow
        } else {
            GuardDecision::RedirectCanonical
        };

        match classify_path(path) {
            PathClass::Excluded => GuardDecision::Allow,
            PathClass::OutsideZone => GuardDecision::Redirect(SIGN_IN_PATH),
            PathClass::TechnicianPublic if signed_in => GuardDecision::Redirect(ORDERS_PATH),
            PathClass::TechnicianPublic => allow,
            PathClass::TechnicianProtected if signed_in => allow,
            PathClass::TechnicianProtected => GuardDecision::Redirect(SIGN_IN_PATH),
        }
    }
}
