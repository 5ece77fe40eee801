//! HTML page rendering
//!
//! Templates live in `templates/` and are compiled into the binary. A
//! template is plain HTML with `{{ name }}` placeholders; rendering is a pure
//! function of the page and a context map. Every substituted value is
//! HTML-escaped, and unknown placeholders render as empty text.

use std::collections::BTreeMap;

use crate::inference::PredictionOutcome;

/// Title used when the context does not provide one
pub const APP_TITLE: &str = "Crop Recommendation";

/// Named values substituted into a template
pub type Context = BTreeMap<&'static str, String>;

/// Pages served by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Form,
    Result,
}

impl Page {
    fn template(&self) -> &'static str {
        match self {
            Page::Home => include_str!("../templates/home.html"),
            Page::Form => include_str!("../templates/form.html"),
            Page::Result => include_str!("../templates/result.html"),
        }
    }
}

/// Escape text for safe inclusion in HTML element content and attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render `page` with the given context
pub fn render(page: Page, context: &Context) -> String {
    let template = page.template();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        match after_open.find("}}") {
            Some(close) => {
                let key = after_open[..close].trim();
                match (key, context.get(key)) {
                    (_, Some(value)) => out.push_str(&escape_html(value)),
                    ("title", None) => out.push_str(APP_TITLE),
                    _ => {}
                }
                rest = &after_open[close + 2..];
            }
            None => {
                // Unterminated placeholder, emit verbatim
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render the result page for a prediction outcome
pub fn render_result(outcome: &PredictionOutcome) -> String {
    let mut context = Context::new();
    context.insert("crop", outcome.display_text());
    render(Page::Result, &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::PredictError;

    #[test]
    fn test_static_pages_have_default_title() {
        let home = render(Page::Home, &Context::new());
        assert!(home.contains("<title>Crop Recommendation</title>"));
        assert!(!home.contains("{{"));

        let form = render(Page::Form, &Context::new());
        for name in crate::model::FEATURE_NAMES {
            assert!(form.contains(&format!("name=\"{}\"", name)));
        }
    }

    #[test]
    fn test_result_page_success() {
        let html = render_result(&PredictionOutcome::Success { label: "rice".to_string() });
        assert!(html.contains("<p class=\"crop\">rice</p>"));
    }

    #[test]
    fn test_result_page_error() {
        let html = render_result(&PredictionOutcome::Failure {
            error: PredictError::MissingField("rainfall"),
        });
        assert!(html.contains("Error: missing field &#39;rainfall&#39;"));
    }

    #[test]
    fn test_values_are_escaped() {
        let html = render_result(&PredictionOutcome::Success {
            label: "<script>alert(1)</script>".to_string(),
        });
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a&b "c" <d>"#), "a&amp;b &quot;c&quot; &lt;d&gt;");
    }
}
