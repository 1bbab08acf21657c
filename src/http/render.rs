//! Server-side page rendering
//!
//! Minimal HTML built by hand; all stored and extracted values pass through
//! `escape` before hitting the page.

use crate::http::flash::Flash;
use crate::types::{CheckRecord, UrlEntry, UrlSummary};

/// Landing page with the submission form
pub fn index_page(flash: Option<Flash>) -> String {
    let body = r#"<h1>Page analyzer</h1>
<p>Check a site for basic SEO signals: H1, title, and meta description.</p>
<form action="/urls" method="post">
  <input type="text" name="url" placeholder="https://example.com" maxlength="255">
  <button type="submit">Check</button>
</form>
<p><a href="/urls">All pages</a></p>"#;
    layout("Page analyzer", flash, body)
}

/// All entries, newest first, with their latest check summary
pub fn urls_page(flash: Option<Flash>, summaries: &[UrlSummary]) -> String {
    let mut rows = String::new();
    for summary in summaries {
        let (last_at, last_status) = match &summary.last_check {
            Some(check) => (
                check.created_at.format("%Y-%m-%d %H:%M").to_string(),
                check.status_code.to_string(),
            ),
            None => (String::new(), String::new()),
        };
        rows.push_str(&format!(
            "<tr><td>{id}</td><td><a href=\"/urls/{id}\">{host}</a></td><td>{last_at}</td><td>{last_status}</td></tr>\n",
            id = summary.entry.id,
            host = escape(&summary.entry.host),
        ));
    }

    let body = format!(
        r#"<h1>Pages</h1>
<table>
<tr><th>ID</th><th>Host</th><th>Last check</th><th>Status</th></tr>
{rows}</table>
<p><a href="/">Add another</a></p>"#
    );
    layout("Pages", flash, &body)
}

/// Entry detail with its check history, newest first
pub fn detail_page(flash: Option<Flash>, entry: &UrlEntry, checks: &[CheckRecord]) -> String {
    let mut rows = String::new();
    for check in checks {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            check.id,
            check.status_code,
            escape(&check.seo.heading),
            escape(&check.seo.title),
            escape(&check.seo.description),
            check.created_at.format("%Y-%m-%d %H:%M"),
        ));
    }

    let body = format!(
        r#"<h1>{host}</h1>
<p>Entry {id}, added {created}</p>
<form action="/urls/{id}/checks" method="post">
  <button type="submit">Run check</button>
</form>
<h2>Checks</h2>
<table>
<tr><th>ID</th><th>Status</th><th>H1</th><th>Title</th><th>Description</th><th>Created</th></tr>
{rows}</table>
<p><a href="/urls">All pages</a></p>"#,
        host = escape(&entry.host),
        id = entry.id,
        created = entry.created_at.format("%Y-%m-%d %H:%M"),
    );
    layout(&entry.host, flash, &body)
}

/// 404 page for unknown entry ids
pub fn not_found_page(flash: Option<Flash>) -> String {
    layout(
        "Not found",
        flash,
        "<h1>Page not found</h1>\n<p><a href=\"/urls\">All pages</a></p>",
    )
}

fn layout(title: &str, flash: Option<Flash>, body: &str) -> String {
    let banner = match flash {
        Some(flash) => format!(
            "<div class=\"flash flash-{}\">{}</div>\n",
            flash.level().as_str(),
            flash.text()
        ),
        None => String::new(),
    };
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
{banner}{body}
</body>
</html>"#,
        title = escape(title),
    )
}

/// Escape text for safe interpolation into HTML
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
