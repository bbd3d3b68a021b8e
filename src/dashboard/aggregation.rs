//! Transaction aggregation by customer.
//!
//! Groups the transaction feed by customer ID, keeping a running total and
//! the transactions in the order the feed delivered them. The aggregate is
//! recomputed from scratch whenever the transaction feed is loaded.

use std::{collections::HashMap, fmt::Display};

use time_tz::Tz;

use crate::{CustomerId, Transaction, timezone::format_display_date};

/// Displayed in place of a date for customers with no transactions.
pub const NO_TRANSACTIONS_LABEL: &str = "No transactions";

/// The total and transactions for a single customer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerSummary {
    /// The sum of the amounts of `transactions`.
    pub total_amount: f64,
    /// The customer's transactions in feed order.
    pub transactions: Vec<Transaction>,
}

/// Transactions grouped by customer ID.
///
/// Customers without transactions have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    summaries: HashMap<CustomerId, CustomerSummary>,
}

/// The date of a customer's last transaction, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastTransactionDate {
    /// The formatted date of the last transaction.
    Date(String),
    /// The customer has no transactions.
    NoTransactions,
}

impl Display for LastTransactionDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LastTransactionDate::Date(date) => write!(f, "{date}"),
            LastTransactionDate::NoTransactions => write!(f, "{NO_TRANSACTIONS_LABEL}"),
        }
    }
}

/// Groups `transactions` by customer ID in a single pass.
///
/// Each customer's transactions keep the order they have in `transactions`,
/// no sorting by date is done.
pub fn aggregate(transactions: &[Transaction]) -> Aggregate {
    let mut summaries: HashMap<CustomerId, CustomerSummary> = HashMap::new();

    for transaction in transactions {
        let summary = summaries
            .entry(transaction.customer_id.clone())
            .or_default();
        summary.total_amount += transaction.amount;
        summary.transactions.push(transaction.clone());
    }

    Aggregate { summaries }
}

impl Aggregate {
    /// The summary for `customer_id`, if it has any transactions.
    pub fn get(&self, customer_id: &CustomerId) -> Option<&CustomerSummary> {
        self.summaries.get(customer_id)
    }

    /// The total amount for `customer_id`, zero for customers without transactions.
    pub fn total_amount(&self, customer_id: &CustomerId) -> f64 {
        self.get(customer_id)
            .map(|summary| summary.total_amount)
            .unwrap_or(0.0)
    }

    /// The transactions for `customer_id` in feed order, empty for customers without transactions.
    pub fn transactions(&self, customer_id: &CustomerId) -> &[Transaction] {
        self.get(customer_id)
            .map(|summary| summary.transactions.as_slice())
            .unwrap_or_default()
    }

    /// The transaction that came last in the feed for `customer_id`.
    ///
    /// Note that this is not necessarily the most recent transaction by date.
    pub fn last_transaction(&self, customer_id: &CustomerId) -> Option<&Transaction> {
        self.transactions(customer_id).last()
    }

    /// The date of the last transaction for `customer_id` formatted in `timezone`,
    /// or [LastTransactionDate::NoTransactions].
    pub fn last_transaction_date(
        &self,
        customer_id: &CustomerId,
        timezone: &Tz,
    ) -> LastTransactionDate {
        match self.last_transaction(customer_id) {
            Some(transaction) => {
                LastTransactionDate::Date(format_display_date(transaction.date, timezone))
            }
            None => LastTransactionDate::NoTransactions,
        }
    }

    /// Iterate over every customer ID and its summary, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&CustomerId, &CustomerSummary)> {
        self.summaries.iter()
    }

    /// The number of customers with at least one transaction.
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// Whether there are no transactions at all.
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
