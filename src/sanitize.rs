//! Escaping and stripping of untrusted text before display.

use once_cell::sync::Lazy;
use regex::Regex;

/// Innermost tag: `<`, a run with neither `<` nor `>`, then `>`.
/// Excluding `<` from the run means `<<script>script>` loses its inner tag first
/// and the outer remnant on the next pass.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern compiles"));

/// Scheme prefixes rejected by [`sanitize_url`]
pub const DENIED_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

/// Escape characters meaningful to an HTML renderer. `None` yields an empty string.
pub fn escape_html(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Remove tags until the string stops shrinking.
pub fn strip_tags(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = TAG.replace_all(&current, "").into_owned();
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

/// Trim the URL and reject dangerous schemes, returning an empty string when rejected.
/// Only a case-insensitive prefix check is done; the URL is not parsed.
pub fn sanitize_url(url: &str) -> String {
    let url = url.trim();
    let lower = url.to_lowercase();

    if let Some(scheme) = DENIED_SCHEMES.iter().find(|s| lower.starts_with(*s)) {
        tracing::warn!(scheme = *scheme, url, "dangerous URL protocol detected");
        return String::new();
    }

    url.to_string()
}

/// A table cell for [`safe_table_row`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Untrusted text, escaped on render
    Text(String),
    /// Markup the caller has already sanitized; inserted verbatim
    Html(String),
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

/// Render a `<tr>` where plain text cells are escaped
pub fn safe_table_row(cells: &[Cell]) -> String {
    let mut row = String::from("<tr>");
    for cell in cells {
        row.push_str("<td>");
        match cell {
            Cell::Text(text) => row.push_str(&escape_html(Some(text))),
            Cell::Html(html) => row.push_str(html),
        }
        row.push_str("</td>");
    }
    row.push_str("</tr>");
    row
}
