//! Customer Dashboard is a web app that lists customers, totals their
//! transactions and charts a customer's transaction history on demand.
//!
//! The library is split into the data core and the HTML surface that serves it:
//! - [dashboard::aggregate] groups transactions by customer,
//! - [dashboard::select_visible] filters the customer list,
//! - [dashboard::project] turns one customer's transactions into a chart series,
//! - [DashboardStore] keeps the latest feed results and the derived aggregate,
//! - [build_router] serves the dashboard pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod customer;
pub mod dashboard;
mod endpoints;
mod error;
pub mod feed;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod routing;
mod store;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DEFAULT_FEED_TIMEOUT};
pub use customer::{Customer, CustomerId};
pub use error::Error;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use store::{DashboardSnapshot, DashboardStore, FeedState, RequestToken, load_feeds};
pub use timezone::{format_display_date, get_timezone};
pub use transaction::{Transaction, parse_transaction_date};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
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
