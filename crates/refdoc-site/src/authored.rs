//! Standalone Markdown pages written alongside the reference docs.

use std::fs;
use std::path::{Path, PathBuf};

use refdoc_renderer::{ProseRenderer, split_front_matter};

use crate::error::SiteError;
use crate::index::{IndexEntry, IndexKind};
use crate::page::{PageBody, PageDescriptor};
use crate::path::BreadcrumbItem;

/// Name of the page that becomes the site's home page.
pub const HOME_PAGE: &str = "index";

/// A Markdown page, named after its file stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthoredPage {
    name: String,
    source_path: PathBuf,
    text: String,
}

impl AuthoredPage {
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source_path: PathBuf::from(format!("{name}.md")),
            name,
            text: text.into(),
        }
    }

    /// Read a page from disk.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        tracing::debug!(path = %path.display(), "Loading page");
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            source_path: path.to_path_buf(),
            text,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_home(&self) -> bool {
        self.name == HOME_PAGE
    }

    /// Render the page.
    ///
    /// The title comes from the front matter, else the first heading, else
    /// the page name.
    pub fn render(&self, prose: &ProseRenderer) -> Result<RenderedPage, SiteError> {
        let (front_matter, body) =
            split_front_matter(&self.text).map_err(|source| SiteError::FrontMatter {
                path: self.source_path.clone(),
                source,
            })?;

        let rendered = prose.render(body);
        let mut resources = rendered.resources;

        let title = front_matter
            .title
            .or(rendered.title)
            .unwrap_or_else(|| self.name.clone());
        let summary = match front_matter.summary {
            Some(summary) => {
                let inline = prose.render_inline(&summary);
                resources.extend(inline.resources);
                inline.html
            }
            None => String::new(),
        };

        let page = PageDescriptor {
            url: format!("{}.html", self.name),
            breadcrumb: vec![BreadcrumbItem {
                title,
                url: format!("{}.html", self.name),
            }],
            prefix_wbr: self.name.clone(),
            summary,
            content: Some(rendered.html),
            body: PageBody::Page,
        };

        Ok(RenderedPage {
            page,
            resources,
            is_home: self.is_home(),
        })
    }
}

/// An authored page ready to be emitted.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    pub page: PageDescriptor,
    /// Images referenced by the page.
    pub resources: Vec<String>,
    is_home: bool,
}

impl RenderedPage {
    /// Entry in the page index. The home page has none.
    #[must_use]
    pub fn index_entry(&self) -> Option<IndexEntry> {
        if self.is_home {
            return None;
        }
        Some(IndexEntry::new(
            IndexKind::Page,
            self.page.title(),
            self.page.url.clone(),
            self.page.summary.clone(),
        ))
    }
}
