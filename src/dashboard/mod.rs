//! Dashboard module
//!
//! Groups transactions by customer, filters the customer list and projects a
//! customer's transactions into a chart series. The handlers render the
//! results as the dashboard page and its HTMX fragments.

mod aggregation;
mod charts;
mod filter;
mod graph;
mod handlers;
mod series;
mod tables;

pub use aggregation::{
    Aggregate, CustomerSummary, LastTransactionDate, NO_TRANSACTIONS_LABEL, aggregate,
};
pub use filter::{FilterQuery, FilterState, parse_min_total, select_visible};
pub use graph::GraphView;
pub use handlers::{
    DashboardState, get_close_graph, get_customer_graph, get_customer_table, get_dashboard_page,
    refresh_feeds_endpoint,
};
pub use series::{Series, project};
