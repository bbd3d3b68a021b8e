//! A record source that reads JSON files from a directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    Customer, Error, Transaction,
    feed::{Feed, RecordSource, decode_customers, decode_transactions},
};

/// Reads the feeds from `customers.json` and `transactions.json` in a directory.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    dir: PathBuf,
}

impl FileRecordSource {
    /// Create a source that reads from `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    async fn read(&self, feed: Feed) -> Result<Value, Error> {
        let path = self.dir.join(feed.file_name());
        tracing::debug!("Reading the {feed} feed from {}", path.display());

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|error| Error::FeedUnavailable {
                feed,
                reason: format!("could not read {}: {error}", path.display()),
            })?;

        serde_json::from_str(&text).map_err(|error| Error::FeedUnavailable {
            feed,
            reason: format!("{} is not valid JSON: {error}", path.display()),
        })
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    async fn fetch_customers(&self) -> Result<Vec<Customer>, Error> {
        decode_customers(self.read(Feed::Customers).await?)
    }

    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, Error> {
        decode_transactions(self.read(Feed::Transactions).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use time::macros::datetime;

    use crate::{
        CustomerId, Error, Transaction,
        feed::{Feed, RecordSource},
    };

    use super::FileRecordSource;

    #[tokio::test]
    async fn reads_feeds_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("transactions.json"),
            r#"[{"id": 1, "customer_id": 1, "amount": 50, "date": "2024-01-01"}]"#,
        )
        .unwrap();
        let source = FileRecordSource::new(dir.path());

        let got = source.fetch_transactions().await;

        assert_eq!(
            got,
            Ok(vec![Transaction::new(
                CustomerId::from("1"),
                50.0,
                datetime!(2024-01-01 00:00 UTC)
            )])
        );
    }

    #[tokio::test]
    async fn missing_file_makes_feed_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileRecordSource::new(dir.path());

        let got = source.fetch_customers().await;

        assert!(
            matches!(
                got,
                Err(Error::FeedUnavailable {
                    feed: Feed::Customers,
                    ..
                })
            ),
            "got {got:?}"
        );
    }

    #[tokio::test]
    async fn invalid_json_makes_feed_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("customers.json"), "[{").unwrap();
        let source = FileRecordSource::new(dir.path());

        let got = source.fetch_customers().await;

        assert!(matches!(got, Err(Error::FeedUnavailable { .. })), "got {got:?}");
    }
}
