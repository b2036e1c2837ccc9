//! YAML front matter of authored pages.

use serde::Deserialize;

/// Metadata block at the top of an authored page.
///
/// ```text
/// ---
/// title: Getting started
/// summary: How to install the *package*.
/// ---
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    /// Overrides the title taken from the first heading.
    pub title: Option<String>,
    /// One-line summary, rendered as inline Markdown.
    pub summary: Option<String>,
}

/// Split a page into its front matter and body.
///
/// Pages without a leading `---` line have empty front matter and are
/// returned unchanged.
pub fn split_front_matter(text: &str) -> Result<(FrontMatter, &str), serde_yaml::Error> {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return Ok((FrontMatter::default(), text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let front_matter = if yaml.trim().is_empty() {
                FrontMatter::default()
            } else {
                serde_yaml::from_str(yaml)?
            };
            return Ok((front_matter, body));
        }
        offset += line.len();
    }

    // Unterminated block, treat the whole text as body
    Ok((FrontMatter::default(), text))
}
