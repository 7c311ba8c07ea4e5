// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use std::fmt::Write;

use repair_desk::{TechnicianDirectory, scope_technician_ids};
use repair_desk_persistence::{AccountData, Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::error::{ApiError, AuthError};
use crate::password_policy::PasswordPolicy;

/// Account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Shop staff; may read every report.
    Admin,
    /// A technician; may read only the orders of its own person.
    Technician,
}

impl Role {
    /// The stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Technician => "TECHNICIAN",
        }
    }

    fn parse(value: &str) -> Result<Self, AuthError> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "TECHNICIAN" => Ok(Self::Technician),
            other => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {other}"),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, unexpired session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: i64,
    pub account_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub role: Role,
    /// Technician record the account signs in as.
    pub technician_id: Option<i64>,
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Whether this session is an authenticated technician.
    #[must_use]
    pub fn is_technician(&self) -> bool {
        self.role == Role::Technician
    }

    fn from_account(
        account: &AccountData,
        session_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            session_id,
            account_id: account.account_id,
            login_name: account.login_name.clone(),
            display_name: account.display_name.clone(),
            role: Role::parse(&account.role)?,
            technician_id: account.technician_id,
            expires_at,
        })
    }
}

fn database_failure(err: &PersistenceError) -> AuthError {
    AuthError::AuthenticationFailed {
        reason: format!("Database error: {err}"),
    }
}

/// Authorization service for report access.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the session may read the orders of every technician.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is an Admin.
    pub fn authorize_all_orders(session: &Session) -> Result<(), AuthError> {
        match session.role {
            Role::Admin => Ok(()),
            Role::Technician => Err(AuthError::Unauthorized {
                action: String::from("read_all_orders"),
                reason: String::from("requires ADMIN role"),
            }),
        }
    }

    /// Checks that the session may create, disable or reset accounts.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is an Admin.
    pub fn authorize_account_management(session: &Session) -> Result<(), AuthError> {
        match session.role {
            Role::Admin => Ok(()),
            Role::Technician => Err(AuthError::Unauthorized {
                action: String::from("manage_accounts"),
                reason: String::from("requires ADMIN role"),
            }),
        }
    }

    /// Returns the technician record a technician session signs in as.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not a technician or has no
    /// technician record linked.
    pub fn own_technician_id(session: &Session) -> Result<i64, AuthError> {
        match (session.role, session.technician_id) {
            (Role::Technician, Some(technician_id)) => Ok(technician_id),
            (Role::Technician, None) => Err(AuthError::Unauthorized {
                action: String::from("read_own_orders"),
                reason: String::from("account is not linked to a technician"),
            }),
            (Role::Admin, _) => Err(AuthError::Unauthorized {
                action: String::from("read_own_orders"),
                reason: String::from("requires TECHNICIAN role"),
            }),
        }
    }

    /// Checks that the session may read data of `technician_id`.
    ///
    /// Admins may read any technician. A technician may read any record in
    /// its own equivalence class, so a person with several records sees all
    /// of them.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if access is refused, or an upstream
    /// error if the directory fails.
    pub fn authorize_technician_access<D>(
        directory: &mut D,
        session: &Session,
        technician_id: i64,
    ) -> Result<(), ApiError>
    where
        D: TechnicianDirectory + ?Sized,
    {
        if session.role == Role::Admin {
            return Ok(());
        }

        let own_id: i64 = Self::own_technician_id(session)?;
        if own_id == technician_id {
            return Ok(());
        }

        if scope_technician_ids(directory, own_id)?.contains(&technician_id) {
            return Ok(());
        }

        warn!(
            account_id = session.account_id,
            technician_id, "Refused access to another technician"
        );
        Err(ApiError::Unauthorized {
            action: String::from("read_technician"),
            reason: format!("technician {technician_id} belongs to another person"),
        })
    }
}

/// Setup code symbols. 32 of them, without look-alikes such as `0`/`O`.
const SETUP_CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

const SETUP_CODE_LENGTH: usize = 10;

/// Generates a one-time setup code for the set-password flow.
#[must_use]
pub fn generate_setup_code() -> String {
    let bytes: [u8; SETUP_CODE_LENGTH] = rand::random();
    bytes
        .iter()
        .map(|byte| {
            char::from(SETUP_CODE_ALPHABET[usize::from(*byte) % SETUP_CODE_ALPHABET.len()])
        })
        .collect()
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates an account and creates a session.
    ///
    /// Returns the new session token and the resolved session.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is unknown, disabled, has no password
    /// yet, or the password does not match.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
    ) -> Result<(String, Session), AuthError> {
        let invalid_credentials = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid login name or password"),
        };

        let Some(account) = persistence
            .get_account_by_login(login_name)
            .map_err(|e| database_failure(&e))?
        else {
            warn!(login_name, "Login for unknown account");
            return Err(invalid_credentials());
        };

        if account.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let Some(password_hash) = account.password_hash.as_deref() else {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Password has not been set; use the setup code"),
            });
        };

        let password_matches: bool = Persistence::verify_password(password, password_hash)
            .map_err(|e| database_failure(&e))?;
        if !password_matches {
            warn!(account_id = account.account_id, "Login with wrong password");
            return Err(invalid_credentials());
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;

        let session_id: i64 = persistence
            .create_session(&session_token, account.account_id, expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(account.account_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        let session: Session = Session::from_account(&account, session_id, expires_at)?;
        info!(
            account_id = session.account_id,
            role = %session.role,
            "Login succeeded"
        );

        Ok((session_token, session))
    }

    /// Validates a session token and returns the session.
    ///
    /// Expired sessions are deleted and rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown or expired, or the account
    /// is missing or disabled.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<Session, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| database_failure(&e))?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Rfc3339)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            warn!(session_id = session.session_id, "Rejected expired session");
            persistence
                .delete_session(session_token)
                .map_err(|e| database_failure(&e))?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(session.account_id)
            .map_err(|e| database_failure(&e))?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        if account.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        persistence
            .update_session_activity(session.session_id)
            .map_err(|e| database_failure(&e))?;

        Session::from_account(&account, session.session_id, expires_at)
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    /// Sets a password by redeeming the account's one-time setup code.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` if the account is unknown,
    /// disabled, or the setup code does not match, and
    /// `ApiError::PasswordPolicyViolation` if the password is rejected.
    pub fn set_password(
        persistence: &mut Persistence,
        login_name: &str,
        setup_code: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<(), ApiError> {
        let invalid_code = || ApiError::AuthenticationFailed {
            reason: String::from("Invalid login name or setup code"),
        };

        let account: AccountData = persistence
            .get_account_by_login(login_name)?
            .ok_or_else(invalid_code)?;

        if account.is_disabled {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        if account.setup_code.as_deref() != Some(setup_code.trim()) {
            warn!(account_id = account.account_id, "Rejected setup code");
            return Err(invalid_code());
        }

        PasswordPolicy::default().validate(password, confirmation, &account.login_name)?;

        persistence.set_password(account.account_id, password)?;
        info!(account_id = account.account_id, "Password set from setup code");

        Ok(())
    }

    /// Generates a 256-bit random session token, hex encoded.
    fn generate_session_token() -> String {
        let bytes: [u8; 32] = rand::random();
        bytes
            .iter()
            .fold(String::with_capacity(64), |mut token, byte| {
                let _ = write!(token, "{byte:02x}");
                token
            })
    }
}
