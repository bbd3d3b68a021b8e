//! Decoding of feed bodies into records.
//!
//! A body must be a JSON array. Records that are missing a field or have a
//! field that cannot be parsed are logged and skipped, the rest are kept.

use serde::Deserialize;
use serde_json::Value;

use crate::{Customer, CustomerId, Error, Transaction, feed::Feed, parse_transaction_date};

/// Decode the body of the customer feed.
///
/// # Errors
/// Returns [Error::FeedUnavailable] if `body` is not a JSON array.
pub fn decode_customers(body: Value) -> Result<Vec<Customer>, Error> {
    decode_records(Feed::Customers, body, decode_customer)
}

/// Decode the body of the transaction feed, keeping feed order.
///
/// # Errors
/// Returns [Error::FeedUnavailable] if `body` is not a JSON array.
pub fn decode_transactions(body: Value) -> Result<Vec<Transaction>, Error> {
    decode_records(Feed::Transactions, body, decode_transaction)
}

fn decode_records<T>(
    feed: Feed,
    body: Value,
    decode: fn(Value) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let Value::Array(records) = body else {
        return Err(Error::FeedUnavailable {
            feed,
            reason: format!("expected a JSON array, got {}", json_kind(&body)),
        });
    };

    let record_count = records.len();
    let decoded: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            decode(record)
                .inspect_err(|error| tracing::warn!("skipping {feed} record {index}: {error}"))
                .ok()
        })
        .collect();

    if decoded.len() < record_count {
        tracing::warn!(
            "skipped {} of {record_count} {feed} records",
            record_count - decoded.len()
        );
    }

    Ok(decoded)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode_customer(record: Value) -> Result<Customer, Error> {
    serde_json::from_value(record).map_err(|error| Error::MalformedRecord(error.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
struct RawTransaction {
    customer_id: CustomerId,
    amount: RawAmount,
    date: String,
}

fn decode_transaction(record: Value) -> Result<Transaction, Error> {
    let raw: RawTransaction = serde_json::from_value(record)
        .map_err(|error| Error::MalformedRecord(error.to_string()))?;

    let amount = match raw.amount {
        RawAmount::Number(amount) => amount,
        RawAmount::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::MalformedRecord(format!("amount {text:?} is not a number")))?,
    };

    if !amount.is_finite() {
        return Err(Error::MalformedRecord(format!(
            "amount {amount} is not a finite number"
        )));
    }

    let date = parse_transaction_date(&raw.date)?;

    Ok(Transaction::new(raw.customer_id, amount, date))
}
