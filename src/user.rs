//! Defines a user of the application and its validated username.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, password::PasswordHash};

/// A validated username.
///
/// Usernames double as the file stem of the user's ledger record, so they are
/// restricted to non-empty strings of ASCII letters, digits, hyphens and
/// underscores. This keeps path separators and other special characters out
/// of file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create and validate a username from a string.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidUsername] if `raw_username` is empty or
    /// contains characters other than ASCII letters, digits, hyphens and
    /// underscores.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let is_valid = !raw_username.is_empty()
            && raw_username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if is_valid {
            Ok(Self(raw_username.to_string()))
        } else {
            Err(Error::InvalidUsername(raw_username.to_string()))
        }
    }

    /// Get the username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// The caller should ensure that `username` is unique across the credential
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's unique name, chosen at registration.
    pub username: Username,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

impl User {
    /// Create a new user.
    pub fn new(username: Username, password_hash: PasswordHash) -> Self {
        Self {
            username,
            password_hash,
        }
    }
}

#[cfg(test)]
mod username_tests {
    use crate::Error;

    use super::Username;

    #[test]
    fn new_accepts_alphanumeric_usernames() {
        for raw in ["alice", "Bob42", "under_score", "with-hyphen"] {
            let username = Username::new(raw);

            assert_eq!(username, Ok(Username(raw.to_string())));
        }
    }

    #[test]
    fn new_fails_on_empty_username() {
        let result = Username::new("");

        assert_eq!(result, Err(Error::InvalidUsername("".to_string())));
    }

    #[test]
    fn new_fails_on_path_separators() {
        for raw in ["../alice", "a/b", "a\\b", "alice.csv"] {
            let result = Username::new(raw);

            assert_eq!(result, Err(Error::InvalidUsername(raw.to_string())));
        }
    }

    #[test]
    fn new_fails_on_whitespace() {
        let result = Username::new("alice smith");

        assert_eq!(
            result,
            Err(Error::InvalidUsername("alice smith".to_string()))
        );
    }
}
