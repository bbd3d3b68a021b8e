//! The latest feed results and the state derived from them.
//!
//! The store holds an immutable [DashboardSnapshot]. Every feed update builds
//! a new snapshot, re-running the aggregator when the transactions change,
//! and swaps it in. Handlers clone the current snapshot and never see a
//! partially applied update.
//!
//! Each retrieval is tagged with a [RequestToken]. Starting a new retrieval
//! of a feed makes the tokens of earlier retrievals of that feed stale, and
//! responses with stale tokens are discarded.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    Customer, Error, Transaction,
    dashboard::{Aggregate, aggregate},
    feed::{Feed, RecordSource},
};

/// The load state of one record feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedState<T> {
    /// The feed has not been loaded yet.
    #[default]
    Pending,
    /// The feed was loaded.
    Ready(Vec<T>),
    /// The last retrieval failed, the string describes why.
    Failed(String),
}

impl<T> FeedState<T> {
    fn from_result(result: Result<Vec<T>, Error>) -> Self {
        match result {
            Ok(records) => FeedState::Ready(records),
            Err(error) => FeedState::Failed(error.to_string()),
        }
    }

    /// The loaded records, empty if the feed is pending or failed.
    pub fn records(&self) -> &[T] {
        match self {
            FeedState::Ready(records) => records,
            FeedState::Pending | FeedState::Failed(_) => &[],
        }
    }

    /// Whether the feed has not been loaded yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, FeedState::Pending)
    }

    /// Why the feed failed to load, if it did.
    pub fn failure(&self) -> Option<&str> {
        match self {
            FeedState::Failed(reason) => Some(reason),
            FeedState::Pending | FeedState::Ready(_) => None,
        }
    }
}

/// Everything currently known about the feeds.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    /// The customer feed.
    pub customers: Arc<FeedState<Customer>>,
    /// The transaction feed.
    pub transactions: Arc<FeedState<Transaction>>,
    /// The transactions grouped by customer, empty unless the transaction feed is ready.
    pub aggregate: Arc<Aggregate>,
}

/// Identifies one retrieval of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    feed: Feed,
    generation: u64,
}

impl RequestToken {
    /// The feed being retrieved.
    pub fn feed(&self) -> Feed {
        self.feed
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    snapshot: Arc<DashboardSnapshot>,
    customer_generation: u64,
    transaction_generation: u64,
}

impl StoreInner {
    fn generation_mut(&mut self, feed: Feed) -> &mut u64 {
        match feed {
            Feed::Customers => &mut self.customer_generation,
            Feed::Transactions => &mut self.transaction_generation,
        }
    }
}

/// Shared holder of the current [DashboardSnapshot].
#[derive(Debug, Default)]
pub struct DashboardStore {
    inner: Mutex<StoreInner>,
}

impl DashboardStore {
    /// Create a store where both feeds are pending.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>, Error> {
        self.inner
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire dashboard state lock: {error}"))
            .map_err(|_| Error::StateLockError)
    }

    /// The current snapshot.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the lock is poisoned.
    pub fn snapshot(&self) -> Result<Arc<DashboardSnapshot>, Error> {
        Ok(self.lock()?.snapshot.clone())
    }

    /// Start a new retrieval of `feed`, making the tokens of earlier retrievals of `feed` stale.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the lock is poisoned.
    pub fn begin_request(&self, feed: Feed) -> Result<RequestToken, Error> {
        let mut inner = self.lock()?;
        let generation = inner.generation_mut(feed);
        *generation += 1;

        Ok(RequestToken {
            feed,
            generation: *generation,
        })
    }

    /// Store the result of the customer retrieval identified by `token`.
    ///
    /// Returns `false` if the response was discarded because `token` is stale.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the lock is poisoned.
    pub fn apply_customers(
        &self,
        token: RequestToken,
        result: Result<Vec<Customer>, Error>,
    ) -> Result<bool, Error> {
        let customers = Arc::new(FeedState::from_result(result));

        self.apply(Feed::Customers, token, |snapshot| DashboardSnapshot {
            customers,
            transactions: snapshot.transactions.clone(),
            aggregate: snapshot.aggregate.clone(),
        })
    }

    /// Store the result of the transaction retrieval identified by `token` and
    /// recompute the aggregate.
    ///
    /// A failed retrieval leaves an empty aggregate.
    /// Returns `false` if the response was discarded because `token` is stale.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the lock is poisoned.
    pub fn apply_transactions(
        &self,
        token: RequestToken,
        result: Result<Vec<Transaction>, Error>,
    ) -> Result<bool, Error> {
        let transactions = FeedState::from_result(result);
        let aggregate = Arc::new(aggregate(transactions.records()));
        let transactions = Arc::new(transactions);

        self.apply(Feed::Transactions, token, |snapshot| DashboardSnapshot {
            customers: snapshot.customers.clone(),
            transactions,
            aggregate,
        })
    }

    fn apply(
        &self,
        feed: Feed,
        token: RequestToken,
        update: impl FnOnce(&DashboardSnapshot) -> DashboardSnapshot,
    ) -> Result<bool, Error> {
        let mut inner = self.lock()?;
        let current_generation = *inner.generation_mut(feed);

        if token.feed != feed || token.generation != current_generation {
            tracing::debug!(
                "discarding stale {feed} response (token {token:?}, current generation {current_generation})"
            );
            return Ok(false);
        }

        inner.snapshot = Arc::new(update(&inner.snapshot));

        Ok(true)
    }
}

/// Retrieve both feeds from `source` concurrently and store the results.
///
/// Each retrieval is bounded by `timeout`. Failures are logged and stored as
/// [FeedState::Failed], they never stop the other feed from loading.
pub async fn load_feeds(store: &DashboardStore, source: &dyn RecordSource, timeout: Duration) {
    tokio::join!(
        load_feed(
            store,
            Feed::Customers,
            timeout,
            source.fetch_customers(),
            DashboardStore::apply_customers,
        ),
        load_feed(
            store,
            Feed::Transactions,
            timeout,
            source.fetch_transactions(),
            DashboardStore::apply_transactions,
        ),
    );
}

async fn load_feed<T>(
    store: &DashboardStore,
    feed: Feed,
    timeout: Duration,
    fetch: impl Future<Output = Result<Vec<T>, Error>>,
    apply: fn(&DashboardStore, RequestToken, Result<Vec<T>, Error>) -> Result<bool, Error>,
) {
    let token = match store.begin_request(feed) {
        Ok(token) => token,
        Err(error) => {
            tracing::error!("could not start loading the {feed} feed: {error}");
            return;
        }
    };

    let result = tokio::time::timeout(timeout, fetch)
        .await
        .unwrap_or_else(|_| {
            Err(Error::FeedUnavailable {
                feed,
                reason: format!("timed out after {timeout:?}"),
            })
        })
        .inspect(|records| tracing::info!("Loaded {} {feed}", records.len()))
        .inspect_err(|error| tracing::error!("could not load the {feed} feed: {error}"));

    if let Err(error) = apply(store, token, result) {
        tracing::error!("could not store the {feed} feed: {error}");
    }
}
