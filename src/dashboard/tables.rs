//! Table view of the filtered customer list.

use maud::{Markup, html};
use time_tz::Tz;

use crate::{
    Customer, CustomerId, FeedState, Transaction,
    dashboard::{
        aggregation::{Aggregate, LastTransactionDate},
        graph::GRAPH_MODAL_ID,
    },
    endpoints::{self, format_endpoint},
    feed::Feed,
    html::{
        BUTTON_PRIMARY_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
};

/// The HTML element ID of the container the table is swapped into.
pub(super) const CUSTOMER_TABLE_ID: &str = "customer-table";

/// One row of the customer table.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CustomerRow {
    pub id: CustomerId,
    pub name: String,
    pub total_amount: f64,
    pub last_transaction: LastTransactionDate,
}

/// Build the table rows for `visible` customers, keeping their order.
pub(super) fn build_customer_rows(
    visible: &[&Customer],
    aggregate: &Aggregate,
    timezone: &Tz,
) -> Vec<CustomerRow> {
    visible
        .iter()
        .map(|customer| CustomerRow {
            id: customer.id.clone(),
            name: customer.name.clone(),
            total_amount: aggregate.total_amount(&customer.id),
            last_transaction: aggregate.last_transaction_date(&customer.id, timezone),
        })
        .collect()
}

/// Renders a notice for each feed that is still loading or failed to load.
pub(super) fn feed_status_view(
    customers: &FeedState<Customer>,
    transactions: &FeedState<Transaction>,
) -> Markup {
    let statuses = [
        (Feed::Customers, customers.is_pending(), customers.failure()),
        (
            Feed::Transactions,
            transactions.is_pending(),
            transactions.failure(),
        ),
    ];

    html! {
        @for (feed, is_pending, failure) in statuses {
            @if is_pending {
                p
                    data-feed-status="pending"
                    class="mb-2 text-sm text-gray-600 dark:text-gray-400"
                {
                    "Loading " (feed) "..."
                }
            }

            @if let Some(reason) = failure {
                p
                    data-feed-status="failed"
                    title=(reason)
                    class="mb-2 text-sm text-red-600 dark:text-red-400"
                {
                    "Could not load " (feed) ". Check the server logs for details."
                }
            }
        }
    }
}

/// Renders the customer table, or a message if there are no rows.
pub(super) fn customers_table(rows: &[CustomerRow]) -> Markup {
    let graph_target = format!("#{GRAPH_MODAL_ID}");

    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-center text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Customer ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Total Transaction Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Last Transaction Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for row in rows {
                        tr class=(TABLE_ROW_STYLE) data-customer-id=(row.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (row.id) }
                            td class=(TABLE_CELL_STYLE) { (row.name) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.total_amount)) }
                            td class=(TABLE_CELL_STYLE) { (row.last_transaction) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                button
                                    type="button"
                                    hx-get=(format_endpoint(endpoints::CUSTOMER_GRAPH, row.id.as_str()))
                                    hx-target=(graph_target)
                                    hx-swap="innerHTML"
                                    class=(BUTTON_PRIMARY_STYLE)
                                {
                                    "View Graph"
                                }
                            }
                        }
                    }

                    @if rows.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class=(TABLE_CELL_STYLE) { "No customers" }
                        }
                    }
                }
            }
        }
    }
}
