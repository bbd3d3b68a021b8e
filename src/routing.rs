//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    dashboard::{
        get_close_graph, get_customer_graph, get_customer_table, get_dashboard_page,
        refresh_feeds_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::CUSTOMER_TABLE, get(get_customer_table))
        .route(endpoints::CUSTOMER_GRAPH, get(get_customer_graph))
        .route(endpoints::CLOSE_GRAPH, get(get_close_graph))
        .route(endpoints::REFRESH, post(refresh_feeds_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
