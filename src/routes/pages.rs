//! Static page endpoints

use axum::response::Html;

use crate::pages::{render, Context, Page};

/// GET / - Landing page
pub async fn home() -> Html<String> {
    Html(render(Page::Home, &Context::new()))
}

/// GET /form - Measurement input form
pub async fn form_page() -> Html<String> {
    Html(render(Page::Form, &Context::new()))
}
