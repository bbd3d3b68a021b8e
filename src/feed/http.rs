//! A record source backed by a JSON REST server.

use std::{fmt::Display, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{
    Customer, Error, Transaction,
    feed::{Feed, RecordSource, decode_customers, decode_transactions},
};

/// Reads the feeds from `GET {base_url}/customers` and `GET {base_url}/transactions`.
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: Client,
    base_url: String,
}

impl HttpRecordSource {
    /// Create a source for the server at `base_url`, e.g. "http://localhost:5000".
    ///
    /// Every request is bounded by `timeout`.
    ///
    /// # Errors
    /// Returns [Error::InvalidSourceError] if the HTTP client cannot be created.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .inspect_err(|error| tracing::error!("could not create HTTP client: {error}"))
            .map_err(|error| Error::InvalidSourceError(error.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn fetch(&self, feed: Feed) -> Result<Value, Error> {
        let url = format!("{}{}", self.base_url, feed.path());
        tracing::debug!("Requesting the {feed} feed from {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|error| unavailable(feed, error))?
            .error_for_status()
            .map_err(|error| unavailable(feed, error))?;

        response
            .json::<Value>()
            .await
            .map_err(|error| unavailable(feed, error))
    }
}

fn unavailable(feed: Feed, error: impl Display) -> Error {
    Error::FeedUnavailable {
        feed,
        reason: error.to_string(),
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch_customers(&self) -> Result<Vec<Customer>, Error> {
        decode_customers(self.fetch(Feed::Customers).await?)
    }

    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, Error> {
        decode_transactions(self.fetch(Feed::Transactions).await?)
    }
}
