//! Projection of a customer's transactions into a chart series.

use time_tz::Tz;

use crate::{Transaction, timezone::format_display_date};

/// Chart-ready labels and values, one pair per transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    /// Transaction dates formatted as day/month/year.
    pub labels: Vec<String>,
    /// Transaction amounts.
    pub values: Vec<f64>,
}

impl Series {
    /// The number of points in the series.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no points, which is shown as "No data".
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Project `transactions` into a series, keeping their order.
///
/// Labels are the transaction dates in `timezone`, values are the raw amounts.
pub fn project(transactions: &[Transaction], timezone: &Tz) -> Series {
    let labels = transactions
        .iter()
        .map(|transaction| format_display_date(transaction.date, timezone))
        .collect();
    let values = transactions
        .iter()
        .map(|transaction| transaction.amount)
        .collect();

    Series { labels, values }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{CustomerId, Transaction, test_utils::utc, timezone::format_display_date};

    use super::{Series, project};

    #[test]
    fn empty_transactions_give_empty_series() {
        let got = project(&[], utc());

        assert_eq!(got, Series::default());
        assert!(got.is_empty());
    }

    #[test]
    fn projects_dates_and_amounts_in_order() {
        let customer_id = CustomerId::from("1");
        let transactions = vec![
            Transaction::new(customer_id.clone(), 50.0, datetime!(2024-01-01 00:00 UTC)),
            Transaction::new(customer_id, -20.0, datetime!(2024-02-01 00:00 UTC)),
        ];

        let got = project(&transactions, utc());

        assert_eq!(got.labels, vec!["01/01/2024", "01/02/2024"]);
        assert_eq!(got.values, vec![50.0, -20.0]);
    }

    #[test]
    fn label_at_each_index_matches_transaction_date() {
        let customer_id = CustomerId::from("1");
        let transactions = vec![
            Transaction::new(customer_id.clone(), 3.0, datetime!(2024-05-20 12:00 UTC)),
            Transaction::new(customer_id.clone(), 1.0, datetime!(2023-12-31 23:00 UTC)),
            Transaction::new(customer_id, 2.0, datetime!(2024-02-29 08:15 UTC)),
        ];

        let got = project(&transactions, utc());

        assert_eq!(got.labels.len(), transactions.len());
        assert_eq!(got.values.len(), transactions.len());
        for (i, transaction) in transactions.iter().enumerate() {
            assert_eq!(
                got.labels[i],
                format_display_date(transaction.date, utc())
            );
            assert_eq!(got.values[i], transaction.amount);
        }
    }
}
