//! Dashboard handler — serves the single-page analysis UI.

use axum::response::Html;

/// Full dashboard page, embedded at compile time. All interactivity lives
/// in /static/js/main.js; this page needs no server-side rendering.
pub const DASHBOARD_HTML: &str = include_str!("../../templates/dashboard.html");

pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
