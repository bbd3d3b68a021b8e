//! The customer graph overlay.
//!
//! The overlay is either closed or open for exactly one customer. Opening it
//! again for another customer replaces the displayed series.

use maud::{Markup, html};
use time_tz::Tz;

use crate::{
    CustomerId,
    dashboard::{
        aggregation::Aggregate,
        charts::{DashboardChart, chart_view, transactions_chart},
        series::{Series, project},
    },
    endpoints,
    html::BUTTON_SECONDARY_STYLE,
};

/// The HTML element ID of the overlay container.
pub(super) const GRAPH_MODAL_ID: &str = "graph-modal";

const CUSTOMER_CHART_ID: &str = "customer-chart";

/// Whether the graph overlay is showing and, if so, what it shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GraphView {
    /// No graph is displayed.
    #[default]
    Closed,
    /// The graph for `customer_id` is displayed.
    Open {
        /// The customer whose transactions are charted.
        customer_id: CustomerId,
        /// The projected transactions.
        series: Series,
    },
}

impl GraphView {
    /// Open the overlay for `customer_id`, replacing whatever was shown before.
    ///
    /// Customers without transactions get an empty series.
    pub fn open(
        self,
        customer_id: CustomerId,
        aggregate: &Aggregate,
        timezone: &Tz,
    ) -> GraphView {
        let series = project(aggregate.transactions(&customer_id), timezone);

        GraphView::Open {
            customer_id,
            series,
        }
    }

    /// Close the overlay.
    pub fn close(self) -> GraphView {
        GraphView::Closed
    }

    /// Whether the overlay is showing.
    pub fn is_open(&self) -> bool {
        matches!(self, GraphView::Open { .. })
    }
}

/// Renders the content of the overlay container.
///
/// A closed overlay renders nothing.
pub(super) fn graph_overlay_view(view: &GraphView) -> Markup {
    let (customer_id, series) = match view {
        GraphView::Closed => return html! {},
        GraphView::Open {
            customer_id,
            series,
        } => (customer_id, series),
    };

    let close_target = format!("#{GRAPH_MODAL_ID}");

    html!(
        div
            class="fixed inset-0 z-40 flex items-center justify-center bg-gray-900/50 px-4"
            role="dialog"
            aria-modal="true"
        {
            div class="w-full max-w-3xl rounded-lg bg-white dark:bg-gray-800 shadow"
            {
                div class="flex items-center justify-between border-b px-6 py-4 dark:border-gray-700"
                {
                    h2 class="text-xl font-semibold text-gray-900 dark:text-white"
                    {
                        "Graph for Customer ID: " (customer_id)
                    }

                    button
                        type="button"
                        aria-label="Close"
                        hx-get=(endpoints::CLOSE_GRAPH)
                        hx-target=(close_target)
                        hx-swap="innerHTML"
                        class="text-gray-400 hover:text-gray-900 dark:hover:text-white"
                    {
                        "✕"
                    }
                }

                div class="px-6 py-4"
                {
                    @if series.is_empty() {
                        p class="text-center text-gray-500 dark:text-gray-400 py-16"
                        {
                            "No data"
                        }
                    } @else {
                        (chart_view(&DashboardChart {
                            id: CUSTOMER_CHART_ID,
                            options: transactions_chart(customer_id, series).to_string(),
                        }))
                    }
                }

                div class="flex justify-end border-t px-6 py-4 dark:border-gray-700"
                {
                    div class="w-32"
                    {
                        button
                            type="button"
                            hx-get=(endpoints::CLOSE_GRAPH)
                            hx-target=(close_target)
                            hx-swap="innerHTML"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Close"
                        }
                    }
                }
            }
        }
    )
}
