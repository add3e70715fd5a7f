//! Defines the app level error type and its conversion to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_page;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username used for registration already belongs to another user.
    #[error("the username \"{0}\" is already taken")]
    UsernameTaken(String),

    /// The user provided an invalid combination of username and password.
    ///
    /// This error is deliberately the same for an unknown username and a
    /// wrong password so that login responses cannot be used to enumerate
    /// registered usernames.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// The username is empty or contains characters that are not allowed.
    ///
    /// Usernames double as the ledger file stem, so anything outside ASCII
    /// letters, digits, hyphens and underscores is rejected.
    #[error(
        "usernames must be non-empty and contain only letters, digits, hyphens and underscores, \
        got \"{0}\""
    )]
    InvalidUsername(String),

    /// A zero or negative amount was used to create a transaction.
    #[error("transaction amounts must be greater than zero, got {0}")]
    InvalidAmount(f64),

    /// A date string could not be parsed as a calendar date.
    #[error("could not parse \"{0}\" as a date")]
    InvalidDate(String),

    /// A string did not match either transaction type.
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionKind(String),

    /// A string did not match any of the transaction categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// A ledger row was present but could not be parsed.
    #[error("could not parse ledger row: {0}")]
    InvalidRecord(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A record could not be serialized for persistence or export.
    #[error("could not serialize record: {0}")]
    SerializationError(String),

    /// A backing record could not be written.
    ///
    /// Failed writes are surfaced immediately and never retried. The
    /// previously persisted state is untouched since writes are whole-record
    /// overwrites.
    #[error("could not write to the backing store: {0}")]
    StorageError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                error_page("401", "Unauthorized", &self.to_string()),
            )
                .into_response(),
            Error::UsernameTaken(_)
            | Error::InvalidUsername(_)
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::InvalidTransactionKind(_)
            | Error::InvalidCategory(_) => (
                StatusCode::BAD_REQUEST,
                error_page("400", "Bad Request", &self.to_string()),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                internal_error_response()
            }
        }
    }
}

/// Get a response for the client when an unexpected internal error occurred.
///
/// The response intentionally reveals nothing about the cause, the details
/// should be logged before calling this.
pub(crate) fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_page(
            "500",
            "Internal Server Error",
            "Something went wrong on our end. Please try again later.",
        ),
    )
        .into_response()
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn username_taken_maps_to_bad_request() {
        let response = Error::UsernameTaken("alice".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_credentials_maps_to_unauthorized() {
        let response = Error::InvalidCredentials.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn storage_error_maps_to_internal_server_error() {
        let response = Error::StorageError("disk full".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
