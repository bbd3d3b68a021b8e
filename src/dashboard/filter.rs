//! Customer list filtering by name and minimum total.

use serde::{Deserialize, Serialize};

use crate::{Customer, dashboard::aggregation::Aggregate};

/// The raw filter inputs as sent by the dashboard's filter form.
///
/// Both fields are free text, see [FilterState] for the parsed form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    /// Case-insensitive substring to match against customer names.
    #[serde(default)]
    pub name: String,
    /// The minimum total amount, may be empty or unparsable.
    #[serde(default)]
    pub min_total: String,
}

impl FilterQuery {
    /// Encode the query for use in a URL, e.g. "name=ali&min_total=25".
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_else(|error| {
            tracing::error!("could not encode filter query {self:?}: {error}");
            String::new()
        })
    }
}

/// The parsed filter applied to the customer list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Case-insensitive substring to match against customer names.
    pub name_query: String,
    /// Customers whose total is below this amount are hidden.
    pub min_total: Option<f64>,
}

impl From<&FilterQuery> for FilterState {
    fn from(query: &FilterQuery) -> Self {
        Self {
            name_query: query.name.clone(),
            min_total: parse_min_total(&query.min_total),
        }
    }
}

/// Parse the free-text minimum total.
///
/// Empty, unparsable and non-finite input means there is no threshold.
pub fn parse_min_total(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|min_total| min_total.is_finite())
}

/// Select the customers that match `filter`, keeping the order of `customers`.
///
/// A customer matches if its name contains `filter.name_query` ignoring case
/// and its total in `aggregate` (zero if it has no transactions) is at least
/// `filter.min_total`.
pub fn select_visible<'a>(
    customers: &'a [Customer],
    aggregate: &Aggregate,
    filter: &FilterState,
) -> Vec<&'a Customer> {
    let name_query = filter.name_query.to_lowercase();

    customers
        .iter()
        .filter(|customer| {
            let name_match = customer.name.to_lowercase().contains(&name_query);
            let amount_match = filter
                .min_total
                .is_none_or(|min_total| aggregate.total_amount(&customer.id) >= min_total);

            name_match && amount_match
        })
        .collect()
}
