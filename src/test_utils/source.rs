use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    Customer, DashboardStore, Error, Transaction,
    feed::{Feed, RecordSource},
};

/// A record source that returns canned results.
pub(crate) struct StubRecordSource {
    customers: Result<Vec<Customer>, Error>,
    transactions: Result<Vec<Transaction>, Error>,
    transaction_delay: Duration,
}

impl StubRecordSource {
    pub(crate) fn new(
        customers: Result<Vec<Customer>, Error>,
        transactions: Result<Vec<Transaction>, Error>,
    ) -> Self {
        Self {
            customers,
            transactions,
            transaction_delay: Duration::ZERO,
        }
    }

    /// Delay every transaction retrieval by `delay`.
    pub(crate) fn with_transaction_delay(mut self, delay: Duration) -> Self {
        self.transaction_delay = delay;
        self
    }
}

#[async_trait]
impl RecordSource for StubRecordSource {
    async fn fetch_customers(&self) -> Result<Vec<Customer>, Error> {
        self.customers.clone()
    }

    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, Error> {
        if !self.transaction_delay.is_zero() {
            tokio::time::sleep(self.transaction_delay).await;
        }

        self.transactions.clone()
    }
}

/// Create a store holding the given feeds. `None` leaves a feed pending.
#[track_caller]
pub(crate) fn store_with(
    customers: Option<Result<Vec<Customer>, Error>>,
    transactions: Option<Result<Vec<Transaction>, Error>>,
) -> Arc<DashboardStore> {
    let store = DashboardStore::new();

    if let Some(customers) = customers {
        let token = store.begin_request(Feed::Customers).unwrap();
        assert!(store.apply_customers(token, customers).unwrap());
    }

    if let Some(transactions) = transactions {
        let token = store.begin_request(Feed::Transactions).unwrap();
        assert!(store.apply_transactions(token, transactions).unwrap());
    }

    Arc::new(store)
}
