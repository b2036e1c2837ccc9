//! Documentation string normalization.

use refdoc_renderer::escape_html;

/// Normalize indentation of a documentation string.
///
/// Tabs are expanded, leading whitespace is removed from the first line, the
/// common indentation of the remaining lines is removed, and blank lines at
/// the start and end are dropped.
#[must_use]
pub fn clean_doc(doc: &str) -> String {
    let expanded = expand_tabs(doc);
    let mut lines: Vec<&str> = expanded.split('\n').collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let content = line.trim_start();
            (!content.is_empty()).then(|| line.chars().count() - content.chars().count())
        })
        .min()
        .unwrap_or(0);

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start();
    }
    for line in lines.iter_mut().skip(1) {
        *line = strip_margin(line, margin);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.is_empty()).count();
    lines[leading..].join("\n")
}

/// Drop the first `margin` characters of `line`.
fn strip_margin(line: &str, margin: usize) -> &str {
    match line.char_indices().nth(margin) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}

fn expand_tabs(text: &str) -> String {
    if !text.contains('\t') {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let spaces = 8 - column % 8;
                out.extend(std::iter::repeat_n(' ', spaces));
                column += spaces;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// First paragraph of a documentation string, HTML-escaped.
///
/// Missing or empty documentation yields an empty summary.
#[must_use]
pub fn summary(doc: Option<&str>) -> String {
    let Some(doc) = doc.filter(|d| !d.is_empty()) else {
        return String::new();
    };
    let doc = clean_doc(doc);
    let first = doc.split("\n\n").next().unwrap_or_default();
    escape_html(first)
}
