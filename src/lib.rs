//! A personal finance tracker.
//!
//! This library provides a JSON REST API for recording income and expense
//! transactions and for querying summaries and category breakdowns of a
//! user's own records.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod register_user;
mod routing;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{Claims, DEFAULT_TOKEN_DURATION, PasswordHash, TokenKeys, ValidatedPassword};
pub use db::{DEFAULT_POOL_SIZE, DbPool, initialize as initialize_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use user::{User, UserID, get_user_by_email, update_password};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`. In-flight requests are given up to
/// `grace_period` to finish before their connections are closed.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>, grace_period: Duration) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(grace_period));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(grace_period));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent a malformed request, e.g. a missing field, a
    /// non-positive amount or an unparsable date.
    ///
    /// The string is shown to the client and should explain how to fix the
    /// request.
    #[error("{0}")]
    Validation(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The email address used to register or update a user already belongs
    /// to another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The user provided an email and password combination that does not
    /// match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request did not carry a usable bearer token.
    #[error("{0}")]
    Unauthenticated(CredentialError),

    /// The caller is authenticated but tried to access another user's
    /// account.
    #[error("you do not have permission to access this resource")]
    Forbidden,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    /// Resources owned by other users are also reported as not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The category breakdown found no expenses for the user and period.
    #[error("no expenses found for this user and period")]
    NoExpenses,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A bearer token could not be signed.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// A connection could not be checked out of the database pool.
    #[error("could not get a database connection: {0}")]
    PoolError(String),

    /// A blocking database task panicked or was cancelled.
    #[error("a database task failed: {0}")]
    TaskError(String),
}

/// Why a request failed authentication.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The `Authorization` header was absent or did not hold a bearer token.
    #[error("missing or malformed Authorization header")]
    Missing,
    /// The token was malformed or its signature did not verify.
    #[error("invalid token")]
    Invalid,
    /// The token was valid but has expired. The client should log in again.
    #[error("token expired")]
    Expired,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<r2d2::Error> for Error {
    fn from(value: r2d2::Error) -> Self {
        Error::PoolError(value.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(value: JsonRejection) -> Self {
        Error::Validation(format!("invalid JSON body: {}", value.body_text()))
    }
}

impl From<PathRejection> for Error {
    fn from(value: PathRejection) -> Self {
        Error::Validation(format!("invalid path parameter: {}", value.body_text()))
    }
}

impl From<QueryRejection> for Error {
    fn from(value: QueryRejection) -> Self {
        Error::Validation(format!("invalid query string: {}", value.body_text()))
    }
}

impl Error {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Validation(_) | Error::TooWeak(_) | Error::DuplicateEmail => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            Error::Unauthenticated(CredentialError::Expired) => {
                (StatusCode::FORBIDDEN, "token_expired")
            }
            Error::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            Error::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            Error::NotFound | Error::NoExpenses => (StatusCode::NOT_FOUND, "not_found"),
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::SqlError(_)
            | Error::PoolError(_)
            | Error::TaskError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that are not handled above are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{CredentialError, Error};

    async fn body_json(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn expired_token_is_distinguished_from_invalid_token() {
        let (expired_status, expired_body) =
            body_json(Error::Unauthenticated(CredentialError::Expired)).await;
        let (invalid_status, invalid_body) =
            body_json(Error::Unauthenticated(CredentialError::Invalid)).await;

        assert_eq!(expired_status, StatusCode::FORBIDDEN);
        assert_eq!(expired_body["code"], "token_expired");
        assert_eq!(invalid_status, StatusCode::UNAUTHORIZED);
        assert_eq!(invalid_body["code"], "unauthenticated");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = body_json(Error::PoolError("secret detail".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_error");
        assert!(!body["error"].as_str().unwrap().contains("secret detail"));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
