//! Retrieval of the customer and transaction feeds.
//!
//! A [RecordSource] supplies both feeds. The two retrievals are independent
//! and may fail independently.

use std::fmt::Display;

use async_trait::async_trait;

use crate::{Customer, Error, Transaction};

mod decode;
mod file;
mod http;

pub use decode::{decode_customers, decode_transactions};
pub use file::FileRecordSource;
pub use http::HttpRecordSource;

/// One of the two record feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    /// The list of customers.
    Customers,
    /// The list of transactions.
    Transactions,
}

impl Feed {
    /// The path of the feed relative to an HTTP source's base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Feed::Customers => "/customers",
            Feed::Transactions => "/transactions",
        }
    }

    /// The name of the file holding the feed in a data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Feed::Customers => "customers.json",
            Feed::Transactions => "transactions.json",
        }
    }
}

impl Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feed::Customers => write!(f, "customers"),
            Feed::Transactions => write!(f, "transactions"),
        }
    }
}

/// Supplies the customer and transaction feeds.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Retrieve every customer.
    ///
    /// # Errors
    /// Returns [Error::FeedUnavailable] if the feed could not be retrieved.
    /// Individual malformed records are skipped, not reported as errors.
    async fn fetch_customers(&self) -> Result<Vec<Customer>, Error>;

    /// Retrieve every transaction, in feed order.
    ///
    /// # Errors
    /// Returns [Error::FeedUnavailable] if the feed could not be retrieved.
    /// Individual malformed records are skipped, not reported as errors.
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, Error>;
}

#[cfg(test)]
mod tests {
    use super::Feed;

    #[test]
    fn feeds_have_distinct_locations() {
        assert_eq!(Feed::Customers.to_string(), "customers");
        assert_eq!(Feed::Transactions.to_string(), "transactions");
        assert_eq!(Feed::Customers.path(), "/customers");
        assert_eq!(Feed::Transactions.file_name(), "transactions.json");
    }
}
