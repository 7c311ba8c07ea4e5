// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password rules applied when a technician chooses a password.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    #[error("Password must not match the login name")]
    MatchesLoginName,

    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum length in characters.
    pub min_length: usize,
    /// Character classes required, out of 4.
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password against the policy.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks, checked in this order:
    /// confirmation, length, complexity, login name.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        login_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = character_classes(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        if password.eq_ignore_ascii_case(login_name.trim()) {
            return Err(PasswordPolicyError::MatchesLoginName);
        }

        Ok(())
    }
}

fn character_classes(password: &str) -> usize {
    let checks: [fn(&char) -> bool; 4] = [
        char::is_ascii_uppercase,
        char::is_ascii_lowercase,
        char::is_ascii_digit,
        |c: &char| !c.is_ascii_alphanumeric() && !c.is_whitespace(),
    ];
    checks
        .iter()
        .filter(|check| password.chars().any(|c| check(&c)))
        .count()
}
