//! Non-streaming HTML pages.
//!
//! Each streaming page declares the initial signals its generator patches and
//! the `data-init` trigger that opens the stream once the page is loaded.

use axum::response::Html;

const INDEX: &str = include_str!("../templates/index.html");
const TYPEWRITER: &str = include_str!("../templates/typewriter.html");
const TICKER: &str = include_str!("../templates/ticker.html");

/// GET /: progressive loading demo.
pub async fn index() -> Html<&'static str> {
    Html(INDEX)
}

/// GET /typewriter
pub async fn typewriter() -> Html<&'static str> {
    Html(TYPEWRITER)
}

/// GET /ticker
pub async fn ticker() -> Html<&'static str> {
    Html(TICKER)
}
