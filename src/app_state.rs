//! Implements a struct that holds the state of the web server.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::{
    DashboardStore, Error, feed::RecordSource, load_feeds, timezone::get_timezone,
};

/// The default upper bound on a single feed retrieval.
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// The state of the web server.
#[derive(Clone)]
pub struct AppState {
    /// The latest feed results and the aggregate derived from them.
    pub store: Arc<DashboardStore>,

    /// Where the customer and transaction feeds are read from.
    pub source: Arc<dyn RecordSource>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The upper bound on a single feed retrieval.
    pub feed_timeout: Duration,
}

impl AppState {
    /// Create a new [AppState] with both feeds pending.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(
        source: Arc<dyn RecordSource>,
        local_timezone: &str,
        feed_timeout: Duration,
    ) -> Result<Self, Error> {
        if get_timezone(local_timezone).is_none() {
            tracing::error!("Invalid timezone {local_timezone}");
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            store: Arc::new(DashboardStore::new()),
            source,
            local_timezone: local_timezone.to_owned(),
            feed_timeout,
        })
    }

    /// Reload both feeds and wait for them to finish.
    pub async fn refresh_feeds(&self) {
        load_feeds(&self.store, self.source.as_ref(), self.feed_timeout).await;
    }

    /// Reload both feeds in a background task.
    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let state = self.clone();

        tokio::spawn(async move { state.refresh_feeds().await })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("local_timezone", &self.local_timezone)
            .field("feed_timeout", &self.feed_timeout)
            .finish_non_exhaustive()
    }
}
