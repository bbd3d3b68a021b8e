//! The transaction model supplied by the transaction feed.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{CustomerId, Error};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// A single financial transaction for one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The customer the transaction belongs to.
    ///
    /// This may not match any known customer, in which case the transaction
    /// is still aggregated but never shown in the customer table.
    pub customer_id: CustomerId,
    /// A signed amount, positive for money in and negative for money out.
    pub amount: f64,
    /// When the transaction happened.
    pub date: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(customer_id: CustomerId, amount: f64, date: OffsetDateTime) -> Self {
        Self {
            customer_id,
            amount,
            date,
        }
    }
}

/// Parse a transaction date from a feed.
///
/// Accepts RFC 3339 timestamps, which keep their offset, plain dates such as
/// `2024-01-01`, which are treated as midnight UTC, and date-times without an
/// offset, which are treated as UTC.
///
/// # Errors
/// Returns [Error::MalformedRecord] if `text` matches none of these formats.
pub fn parse_transaction_date(text: &str) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(date_time);
    }

    if let Ok(date_time) = PrimitiveDateTime::parse(text, DATE_TIME_FORMAT) {
        return Ok(date_time.assume_utc());
    }

    Date::parse(text, DATE_FORMAT)
        .map(|date| date.midnight().assume_utc())
        .map_err(|error| Error::MalformedRecord(format!("invalid date \"{text}\": {error}")))
}
