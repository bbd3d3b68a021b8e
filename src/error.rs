//! Defines the app level error type and conversions to rendered HTML pages.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, feed::Feed, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// A record feed could not be retrieved.
    ///
    /// Covers transport errors, HTTP error statuses, bodies that are not a
    /// JSON array and retrievals that exceeded the feed timeout. The feed's
    /// derived data is left empty when this happens.
    #[error("the {feed} feed is unavailable: {reason}")]
    FeedUnavailable {
        /// The feed that failed.
        feed: Feed,
        /// A description of the underlying failure.
        reason: String,
    },

    /// A single record in a feed is missing a field or has a field that
    /// cannot be parsed, e.g. a non-numeric amount.
    ///
    /// Malformed records are skipped and logged, the rest of the feed is kept.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The record source could not be set up, e.g. the HTTP client failed to build.
    #[error("invalid record source: {0}")]
    InvalidSourceError(String),

    /// Could not acquire the lock on the dashboard state.
    #[error("could not acquire the dashboard state lock")]
    StateLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::FeedUnavailable { feed, .. } => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: format!("Could not load {feed}"),
                    details: "Check the server logs for details.".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, feed::Feed};

    #[test]
    fn not_found_renders_404() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn feed_errors_render_500() {
        let response = Error::FeedUnavailable {
            feed: Feed::Customers,
            reason: "connection refused".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn alert_response_keeps_status() {
        let response = Error::StateLockError.into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn feed_error_message_names_the_feed() {
        let error = Error::FeedUnavailable {
            feed: Feed::Transactions,
            reason: "timed out".to_owned(),
        };

        assert_eq!(
            error.to_string(),
            "the transactions feed is unavailable: timed out"
        );
    }
}
