//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page and its HTMX fragments
//! - The handler that reloads the feeds
//! - HTML view functions for the page layout and filter controls

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::{HX_TRIGGER, HxRequest};
use maud::{Markup, html};
use std::sync::Arc;
use time_tz::Tz;

use crate::{
    AppState, CustomerId, DashboardSnapshot, DashboardStore, Error,
    alert::Alert,
    dashboard::{
        filter::{FilterQuery, FilterState, select_visible},
        graph::{GRAPH_MODAL_ID, GraphView, graph_overlay_view},
        tables::{CUSTOMER_TABLE_ID, build_customer_rows, customers_table, feed_status_view},
    },
    endpoints,
    feed::Feed,
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_SCRIPT, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, base,
    },
    timezone::get_timezone,
};

/// The HTML element ID of the filter form.
const FILTER_FORM_ID: &str = "filter-form";

/// The HTMX event sent after the feeds have been reloaded.
const FEEDS_REFRESHED_EVENT: &str = "feeds-refreshed";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The latest feed results and the aggregate derived from them.
    pub store: Arc<DashboardStore>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the dashboard page with the filter controls and the customer table.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let timezone = local_timezone(&state.local_timezone)?;
    let snapshot = state.store.snapshot()?;

    let table_section = customer_table_section(&snapshot, &query, timezone);

    Ok(dashboard_view(&query, &table_section).into_response())
}

/// Render the customer table for the filter in the query string.
pub async fn get_customer_table(
    State(state): State<DashboardState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let timezone = local_timezone(&state.local_timezone)?;
    let snapshot = state.store.snapshot()?;

    Ok(customer_table_section(&snapshot, &query, timezone).into_response())
}

/// Render the graph overlay for one customer.
///
/// Customers without transactions get an overlay that says "No data".
pub async fn get_customer_graph(
    State(state): State<DashboardState>,
    Path(customer_id): Path<String>,
) -> Result<Response, Error> {
    let timezone = local_timezone(&state.local_timezone)?;
    let snapshot = state.store.snapshot()?;

    let view = GraphView::Closed.open(
        CustomerId::from(customer_id),
        &snapshot.aggregate,
        timezone,
    );

    Ok(graph_overlay_view(&view).into_response())
}

/// Render the closed graph overlay, which empties the overlay container.
pub async fn get_close_graph() -> Markup {
    graph_overlay_view(&GraphView::Closed)
}

/// Reload both feeds, then tell the page to reload the customer table.
///
/// Requests that do not come from HTMX are redirected to the dashboard page.
pub async fn refresh_feeds_endpoint(
    State(state): State<AppState>,
    HxRequest(is_htmx_request): HxRequest,
) -> Response {
    state.refresh_feeds().await;

    if !is_htmx_request {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    let snapshot = match state.store.snapshot() {
        Ok(snapshot) => snapshot,
        Err(error) => return error.into_alert_response(),
    };

    (
        [(HX_TRIGGER, FEEDS_REFRESHED_EVENT)],
        refresh_alert(&snapshot).into_html(),
    )
        .into_response()
}

fn local_timezone(local_timezone: &str) -> Result<&'static Tz, Error> {
    get_timezone(local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", local_timezone);
        Error::InvalidTimezoneError(local_timezone.to_owned())
    })
}

fn refresh_alert(snapshot: &DashboardSnapshot) -> Alert {
    let failed_feeds: Vec<Feed> = [
        (Feed::Customers, snapshot.customers.failure().is_some()),
        (Feed::Transactions, snapshot.transactions.failure().is_some()),
    ]
    .into_iter()
    .filter_map(|(feed, failed)| failed.then_some(feed))
    .collect();

    match failed_feeds.as_slice() {
        [] => Alert::Success {
            message: "Feeds refreshed".to_owned(),
            details: format!(
                "Loaded {} customers and {} transactions.",
                snapshot.customers.records().len(),
                snapshot.transactions.records().len()
            ),
        },
        [feed] => Alert::Error {
            message: format!("Could not load {feed}"),
            details: "Check the server logs for details.".to_owned(),
        },
        _ => Alert::Error {
            message: "Could not load customers or transactions".to_owned(),
            details: "Check the server logs for details.".to_owned(),
        },
    }
}

/// Renders the feed status and the table of customers that pass `query`.
///
/// While a feed is still loading, the section polls for itself until both
/// feeds have settled.
fn customer_table_section(
    snapshot: &DashboardSnapshot,
    query: &FilterQuery,
    timezone: &Tz,
) -> Markup {
    let filter = FilterState::from(query);
    let visible = select_visible(snapshot.customers.records(), &snapshot.aggregate, &filter);
    let rows = build_customer_rows(&visible, &snapshot.aggregate, timezone);

    let is_loading = snapshot.customers.is_pending() || snapshot.transactions.is_pending();
    let table_target = format!("#{CUSTOMER_TABLE_ID}");
    let filter_form = format!("#{FILTER_FORM_ID}");

    html!(
        @if is_loading {
            div
                hx-get=(endpoints::CUSTOMER_TABLE)
                hx-include=(filter_form)
                hx-trigger="load delay:1s"
                hx-target=(table_target)
                hx-swap="innerHTML"
            {}
        }

        (feed_status_view(&snapshot.customers, &snapshot.transactions))
        (customers_table(&rows))
    )
}

fn dashboard_view(query: &FilterQuery, table_section: &Markup) -> Markup {
    let table_target = format!("#{CUSTOMER_TABLE_ID}");
    let filter_form = format!("#{FILTER_FORM_ID}");
    let refresh_trigger = format!("{FEEDS_REFRESHED_EVENT} from:body");

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex items-center justify-between mb-6"
                {
                    h1 class="text-2xl font-bold" { "Customer Transactions" }

                    div class="w-32"
                    {
                        button
                            type="button"
                            hx-post=(endpoints::REFRESH)
                            hx-target="#alert-container"
                            hx-swap="innerHTML"
                            class=(BUTTON_PRIMARY_STYLE)
                        {
                            "Refresh"
                        }
                    }
                }

                form
                    id=(FILTER_FORM_ID)
                    action=(endpoints::DASHBOARD_VIEW)
                    method="get"
                    hx-get=(endpoints::CUSTOMER_TABLE)
                    hx-target=(table_target)
                    hx-swap="innerHTML"
                    hx-trigger="input delay:300ms, submit"
                    class="grid grid-cols-1 md:grid-cols-2 gap-4 mb-6"
                {
                    div
                    {
                        label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                        input
                            id="name"
                            name="name"
                            type="text"
                            placeholder="Search by Name"
                            value=(query.name)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="min_total" class=(FORM_LABEL_STYLE) { "Minimum Total Amount" }

                        input
                            id="min_total"
                            name="min_total"
                            type="number"
                            step="any"
                            placeholder="Search by Total Amount"
                            value=(query.min_total)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                    id=(CUSTOMER_TABLE_ID)
                    hx-get=(endpoints::CUSTOMER_TABLE)
                    hx-include=(filter_form)
                    hx-trigger=(refresh_trigger)
                    hx-swap="innerHTML"
                {
                    (table_section)
                }
            }
        }

        div id=(GRAPH_MODAL_ID) {}
    );

    let scripts = [HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
    };
    use axum_htmx::HxRequest;
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        AppState, Customer, CustomerId, Error, Transaction,
        dashboard::filter::FilterQuery,
        endpoints,
        feed::Feed,
        test_utils::{
            StubRecordSource, assert_content_type, assert_status_ok, assert_valid_html,
            get_header, parse_html_document, parse_html_fragment, store_with,
        },
    };

    use super::{
        DashboardState, get_close_graph, get_customer_graph, get_customer_table,
        get_dashboard_page, refresh_feeds_endpoint,
    };

    fn test_customers() -> Vec<Customer> {
        vec![Customer::new("1", "Alice"), Customer::new("2", "Bob")]
    }

    fn test_transactions() -> Vec<Transaction> {
        vec![
            Transaction::new(CustomerId::from("1"), 50.0, datetime!(2024-01-01 00:00 UTC)),
            Transaction::new(CustomerId::from("1"), -20.0, datetime!(2024-02-01 00:00 UTC)),
        ]
    }

    fn loaded_state() -> DashboardState {
        DashboardState {
            store: store_with(Some(Ok(test_customers())), Some(Ok(test_transactions()))),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn query(name: &str, min_total: &str) -> Query<FilterQuery> {
        Query(FilterQuery {
            name: name.to_owned(),
            min_total: min_total.to_owned(),
        })
    }

    #[track_caller]
    fn row_texts(html: &Html) -> Vec<Vec<String>> {
        html.select(&Selector::parse("tbody tr[data-customer-id]").unwrap())
            .map(|row| {
                row.select(&Selector::parse("td").unwrap())
                    .map(|cell| cell.text().collect::<String>().trim().to_owned())
                    .collect()
            })
            .collect()
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let response = get_dashboard_page(State(loaded_state()), query("", ""))
            .await
            .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let heading = html
            .select(&Selector::parse("h1").unwrap())
            .next()
            .expect("No heading found")
            .text()
            .collect::<String>();
        assert_eq!(heading.trim(), "Customer Transactions");

        let rows = row_texts(&html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], "Alice");
        assert_eq!(rows[0][2], "$30.00");
        assert_eq!(rows[0][3], "01/02/2024");
        assert_eq!(rows[1][1], "Bob");
        assert_eq!(rows[1][2], "$0.00");
        assert_eq!(rows[1][3], "No transactions");

        let modal = html
            .select(&Selector::parse("#graph-modal").unwrap())
            .next()
            .expect("No graph modal found");
        assert_eq!(modal.inner_html().trim(), "");
    }

    #[tokio::test]
    async fn dashboard_page_has_filter_inputs() {
        let response = get_dashboard_page(State(loaded_state()), query("ali", "25"))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let form = html
            .select(&Selector::parse("form#filter-form").unwrap())
            .next()
            .expect("No filter form found");
        assert_eq!(form.value().attr("hx-get"), Some(endpoints::CUSTOMER_TABLE));
        assert_eq!(form.value().attr("hx-target"), Some("#customer-table"));

        let name_input = form
            .select(&Selector::parse("input[name=name]").unwrap())
            .next()
            .expect("No name input found");
        assert_eq!(name_input.value().attr("placeholder"), Some("Search by Name"));
        assert_eq!(name_input.value().attr("value"), Some("ali"));

        let total_input = form
            .select(&Selector::parse("input[name=min_total]").unwrap())
            .next()
            .expect("No total input found");
        assert_eq!(total_input.value().attr("type"), Some("number"));
        assert_eq!(
            total_input.value().attr("placeholder"),
            Some("Search by Total Amount")
        );
        assert_eq!(total_input.value().attr("value"), Some("25"));

        let rows = row_texts(&html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "Alice");
    }

    #[tokio::test]
    async fn table_partial_applies_filter() {
        let response = get_customer_table(State(loaded_state()), query("ali", "40"))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert!(row_texts(&html).is_empty());
        assert!(html.html().contains("No customers"));
    }

    #[tokio::test]
    async fn table_partial_ignores_unparsable_threshold() {
        let response = get_customer_table(State(loaded_state()), query("", "lots"))
            .await
            .unwrap();

        let html = parse_html_fragment(response).await;
        assert_eq!(row_texts(&html).len(), 2);
    }

    #[tokio::test]
    async fn table_shows_zero_totals_while_transactions_pending() {
        let state = DashboardState {
            store: store_with(Some(Ok(test_customers())), None),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_customer_table(State(state), query("", ""))
            .await
            .unwrap();

        let html = parse_html_fragment(response).await;
        let rows = row_texts(&html);
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row[2], "$0.00");
            assert_eq!(row[3], "No transactions");
        }
        assert!(html.html().contains("Loading transactions..."));
        assert!(
            html.select(&Selector::parse("[hx-trigger='load delay:1s']").unwrap())
                .next()
                .is_some(),
            "want the table to poll while a feed is pending"
        );
    }

    #[tokio::test]
    async fn table_reports_failed_feed() {
        let state = DashboardState {
            store: store_with(
                Some(Ok(test_customers())),
                Some(Err(Error::FeedUnavailable {
                    feed: Feed::Transactions,
                    reason: "timed out after 10s".to_owned(),
                })),
            ),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_customer_table(State(state), query("", ""))
            .await
            .unwrap();

        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("Could not load transactions"));
        assert_eq!(row_texts(&html).len(), 2);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let state = DashboardState {
            store: store_with(None, None),
            local_timezone: "Not/A_Timezone".to_owned(),
        };

        let got = get_customer_table(State(state), query("", "")).await;

        assert!(matches!(got, Err(Error::InvalidTimezoneError(_))));
    }

    #[tokio::test]
    async fn graph_overlay_shows_customer_series() {
        let response = get_customer_graph(State(loaded_state()), Path("1".to_owned()))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let title = html
            .select(&Selector::parse("h2").unwrap())
            .next()
            .expect("No title found")
            .text()
            .collect::<String>();
        assert_eq!(title.trim(), "Graph for Customer ID: 1");
        assert!(html.html().contains("01/01/2024"));
    }

    #[tokio::test]
    async fn graph_overlay_without_transactions_shows_no_data() {
        let response = get_customer_graph(State(loaded_state()), Path("2".to_owned()))
            .await
            .unwrap();

        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("No data"));
    }

    #[tokio::test]
    async fn close_graph_renders_nothing() {
        let markup = get_close_graph().await;

        assert!(markup.into_string().is_empty());
    }

    fn refresh_state() -> AppState {
        let source = StubRecordSource::new(Ok(test_customers()), Ok(test_transactions()));

        AppState::new(Arc::new(source), "Etc/UTC", Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn refresh_reloads_feeds_and_triggers_table_reload() {
        let state = refresh_state();

        let response = refresh_feeds_endpoint(State(state.clone()), HxRequest(true)).await;

        assert_status_ok(&response);
        assert_eq!(get_header(&response, "hx-trigger"), "feeds-refreshed");
        let html = parse_html_fragment(response).await;
        assert!(
            html.html()
                .contains("Loaded 2 customers and 2 transactions."),
            "{}",
            html.html()
        );
        let snapshot = state.store.snapshot().unwrap();
        assert_eq!(snapshot.customers.records().len(), 2);
    }

    #[tokio::test]
    async fn refresh_reports_failed_feed() {
        let source = StubRecordSource::new(
            Err(Error::FeedUnavailable {
                feed: Feed::Customers,
                reason: "connection refused".to_owned(),
            }),
            Ok(test_transactions()),
        );
        let state = AppState::new(Arc::new(source), "Etc/UTC", Duration::from_secs(1)).unwrap();

        let response = refresh_feeds_endpoint(State(state), HxRequest(true)).await;

        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("Could not load customers"));
    }

    #[tokio::test]
    async fn refresh_without_htmx_redirects_to_dashboard() {
        let response = refresh_feeds_endpoint(State(refresh_state()), HxRequest(false)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::DASHBOARD_VIEW);
    }
}
