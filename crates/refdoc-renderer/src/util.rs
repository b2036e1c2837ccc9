//! Shared helpers for HTML output.

use pulldown_cmark::HeadingLevel;

/// Escape text for inclusion in HTML content and attribute values.
///
/// Replaces `&`, `<`, `>`, `"` and `'`.
///
/// ```
/// use refdoc_renderer::escape_html;
///
/// assert_eq!(escape_html("a < b && c"), "a &lt; b &amp;&amp; c");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// True for URLs with a scheme or a network location.
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    url.starts_with("//") || url.contains("://")
}

pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
