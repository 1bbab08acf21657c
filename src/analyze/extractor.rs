//! SEO signal extraction from HTML
//!
//! A total function over arbitrary input: html5ever (via scraper) recovers
//! from malformed markup, and any field it cannot produce comes back as the
//! empty string rather than an error.

use scraper::{Html, Selector};

use crate::types::{clamp_field, SeoFields};

/// Extract heading, title, and meta description from a page body.
///
/// Never fails; fields the document lacks are empty strings, and every field
/// is trimmed and truncated to the storage limit.
pub fn extract(html: &str) -> SeoFields {
    let document = Html::parse_document(html);

    SeoFields {
        heading: first_text(&document, "h1"),
        title: first_text(&document, "title"),
        description: first_attr(&document, r#"meta[name="description"]"#, "content"),
    }
}

/// Text content of the first element matching `selector`, clamped.
fn first_text(document: &Html, selector: &str) -> String {
    let Ok(sel) = Selector::parse(selector) else {
        return String::new();
    };
    document
        .select(&sel)
        .next()
        .map(|el| clamp_field(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// Attribute value of the first element matching `selector`, clamped.
fn first_attr(document: &Html, selector: &str, attr: &str) -> String {
    let Ok(sel) = Selector::parse(selector) else {
        return String::new();
    };
    document
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(clamp_field)
        .unwrap_or_default()
}
