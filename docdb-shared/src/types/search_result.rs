//! Search result rows and their HTML rendering.
//!
//! The browser client receives search results as one HTML fragment string,
//! built here from the rows returned by the search delegate.

use serde::{Deserialize, Serialize};

/// A single search hit reduced to the two fields shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SearchRow {
    /// The hit's title field.
    pub title: String,

    /// The hit's snippet field.
    pub snippet: String,
}

impl SearchRow {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
        }
    }

    /// Render this row as one `fileLine` span.
    pub fn to_html(&self) -> String {
        format!(
            "<span class=\"fileLine\">{}{}</span><br>",
            escape_html(&self.title),
            escape_html(&self.snippet)
        )
    }
}

/// Concatenate the HTML fragments of all rows, preserving their order.
///
/// Zero rows render to the empty string.
pub fn render_rows(rows: &[SearchRow]) -> String {
    rows.iter().map(SearchRow::to_html).collect()
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render_rows(&[]), "");
    }

    #[test]
    fn test_render_preserves_order() {
        let rows = vec![
            SearchRow::new("kimchy", "trying out search"),
            SearchRow::new("alice", "second hit"),
        ];

        assert_eq!(
            render_rows(&rows),
            "<span class=\"fileLine\">kimchytrying out search</span><br>\
             <span class=\"fileLine\">alicesecond hit</span><br>"
        );
    }

    #[test]
    fn test_render_escapes_markup() {
        let row = SearchRow::new("<b>", "a & \"b\"");
        assert_eq!(
            row.to_html(),
            "<span class=\"fileLine\">&lt;b&gt;a &amp; &quot;b&quot;</span><br>"
        );
    }
}
