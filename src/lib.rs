//! Tallybook is a backend for tracking your personal finances: accounts,
//! expenses, income, loans, and investments.
//!
//! This library provides a JSON REST API. Its centrepiece is the balance
//! reconciliation engine in the ledger module, which keeps every account's
//! running balance consistent with the expense and income entries that
//! reference it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod coercion;
mod database_id;
mod db;
mod endpoints;
mod investment;
mod ledger;
mod loan;
mod routing;
mod timezone;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::account::AccountId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
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
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A ledger entry referenced an account that does not exist.
    ///
    /// Raised when applying an entry's balance effect: the whole mutation is
    /// rolled back, leaving both the entry and all balances untouched.
    #[error("account {0} does not exist")]
    AccountNotFound(AccountId),

    /// A monetary amount could not be parsed from the request.
    ///
    /// Callers should pass the raw input so the client can see what was
    /// rejected.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// An account reference could not be parsed as an integer ID.
    #[error("invalid account reference: {0}")]
    InvalidReference(String),

    /// The entry was well-formed JSON but failed validation, e.g. a negative
    /// amount.
    #[error("validation failed: {0}")]
    ValidationFailure(String),

    /// An error occurred while getting the local offset from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::NotFound | Error::AccountNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            Error::InvalidAmount(_)
            | Error::InvalidReference(_)
            | Error::ValidationFailure(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}
