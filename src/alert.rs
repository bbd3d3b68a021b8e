//! Alert messages shown in the alert container at the bottom of the page.
//!
//! Alerts are swapped into `#alert-container` by HTMX and can be dismissed by the user.

use maud::{Markup, html};

/// A dismissible success or error message.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, icon) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "flex items-start p-4 mb-4 text-green-800 rounded-lg bg-green-50 \
                    dark:bg-gray-800 dark:text-green-400 shadow",
                "✓",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "flex items-start p-4 mb-4 text-red-800 rounded-lg bg-red-50 \
                    dark:bg-gray-800 dark:text-red-400 shadow",
                "!",
            ),
        };

        html!(
            div class=(container_style) role="alert"
            {
                span class="shrink-0 font-bold me-3" aria-hidden="true" { (icon) }

                div class="text-sm"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-auto -mx-1.5 -my-1.5 p-1.5 rounded-lg hover:opacity-75"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "✕"
                }
            }
        )
    }
}
