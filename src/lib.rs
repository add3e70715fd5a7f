//! Cashboard is a web app for tracking personal income and expenses.
//!
//! Users register and log in with a username and password, record
//! transactions, and view a dashboard with totals, budget alerts, charts and
//! export downloads. State lives in flat files: one shared JSON record for
//! credentials and one CSV ledger per user.
//!
//! This library provides the domain core (credential store, ledger store and
//! the aggregation functions) and an HTTP server that directly serves HTML
//! pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod dashboard;
mod endpoints;
mod error;
mod export;
mod html;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod new_transaction;
mod password;
mod register;
mod routing;
pub mod stores;
mod transaction;
mod user;

pub use app_state::AppState;
pub use auth::{Session, authenticate, register};
pub use dashboard::aggregation;
pub use error::Error;
pub use export::{REPORT_TITLE, ledger_to_csv, render_report};
pub use password::PasswordHash;
pub use routing::build_router;
pub use transaction::{Category, Ledger, Transaction, TransactionKind};
pub use user::{User, Username};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
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
