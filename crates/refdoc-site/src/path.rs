//! Qualified paths and the URLs derived from them.

use std::fmt;

use serde::Serialize;

/// Dotted sequence of names locating a documented entity.
///
/// The last segment is the display name. Joining all segments with `.` and
/// appending `.html` yields the page URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedPath {
    segments: Vec<String>,
}

impl QualifiedPath {
    /// Path of a root module.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self {
            segments: vec![name.to_owned()],
        }
    }

    /// Path of a member of this entity.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.to_owned());
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Display name (last segment).
    #[must_use]
    pub fn name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Page URL, e.g. `pkg.sub.Class.html`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{self}.html")
    }

    /// One breadcrumb item per segment, from the root down to this path.
    #[must_use]
    pub fn breadcrumb(&self) -> Vec<BreadcrumbItem> {
        let mut url_base = String::new();
        self.segments
            .iter()
            .map(|segment| {
                url_base.push_str(segment);
                url_base.push('.');
                BreadcrumbItem {
                    title: segment.clone(),
                    url: format!("{url_base}html"),
                }
            })
            .collect()
    }

    /// Segments joined with soft-break markers, including a trailing one.
    ///
    /// `["pkg", "Class"]` becomes `pkg.<wbr />Class.<wbr />`.
    #[must_use]
    pub fn prefix_wbr(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(segment);
            out.push_str(".<wbr />");
        }
        out
    }
}

impl fmt::Display for QualifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    /// Display title.
    pub title: String,
    /// Link target.
    pub url: String,
}
