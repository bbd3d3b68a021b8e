//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/dashboard/customers/{customer_id}/graph',
//! use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page with the filter controls and customer table.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The customer table fragment, filtered by the query string.
pub const CUSTOMER_TABLE: &str = "/dashboard/customers";
/// The graph overlay fragment for one customer.
pub const CUSTOMER_GRAPH: &str = "/dashboard/customers/{customer_id}/graph";
/// The route that closes the graph overlay.
pub const CLOSE_GRAPH: &str = "/dashboard/graph/close";

/// The route that reloads both record feeds.
pub const REFRESH: &str = "/api/refresh";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// `id` is percent-encoded so that IDs with spaces or slashes still form a
/// single path segment.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        encode_path_segment(id),
        &endpoint_path[param_end..]
    )
}

fn encode_path_segment(segment: &str) -> String {
    // Form encoding writes spaces as '+', which is a literal plus sign in a path.
    serde_urlencoded::to_string([("", segment)])
        .map(|encoded| encoded.trim_start_matches('=').replace('+', "%20"))
        .unwrap_or_else(|error| {
            tracing::error!("could not encode path segment {segment:?}: {error}");
            segment.to_owned()
        })
}
