//! Rendering boundary: page data in, file contents out.

use std::fmt;

use serde::Serialize;

use crate::index::SiteIndex;
use crate::page::{PageBody, PageDescriptor};

/// Template a page or index is rendered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    Module,
    Class,
    Page,
    ModuleIndex,
    ClassIndex,
    PageIndex,
}

impl Template {
    /// Index templates with the file each one produces.
    pub const INDEXES: [(Template, &'static str); 3] = [
        (Template::ModuleIndex, "modules.html"),
        (Template::ClassIndex, "classes.html"),
        (Template::PageIndex, "pages.html"),
    ];

    /// Template matching the kind of a page.
    #[must_use]
    pub fn for_page(page: &PageDescriptor) -> Self {
        match page.body {
            PageBody::Module(_) => Self::Module,
            PageBody::Class(_) => Self::Class,
            PageBody::Page => Self::Page,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Page => "page",
            Self::ModuleIndex => "module_index",
            Self::ClassIndex => "class_index",
            Self::PageIndex => "page_index",
        }
    }

    #[must_use]
    pub fn is_index(self) -> bool {
        matches!(self, Self::ModuleIndex | Self::ClassIndex | Self::PageIndex)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Data handed to a template.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderData<'a> {
    Page(&'a PageDescriptor),
    Index(&'a SiteIndex),
}

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template {template} cannot render {data} data")]
    Unsupported {
        template: Template,
        data: &'static str,
    },
}

/// Serializes page data with a template.
pub trait Emitter {
    fn emit(&self, template: Template, data: RenderData<'_>) -> Result<Vec<u8>, EmitError>;

    /// Output file name for a page URL.
    fn file_name(&self, url: &str) -> String {
        url.to_owned()
    }
}

/// Emits page data as pretty-printed JSON documents, one per page.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonEmitter;

#[derive(Serialize)]
struct JsonDocument<'a> {
    template: Template,
    #[serde(flatten)]
    data: RenderData<'a>,
}

impl Emitter for JsonEmitter {
    fn emit(&self, template: Template, data: RenderData<'_>) -> Result<Vec<u8>, EmitError> {
        Ok(serde_json::to_vec_pretty(&JsonDocument { template, data })?)
    }

    fn file_name(&self, url: &str) -> String {
        match url.strip_suffix(".html") {
            Some(stem) => format!("{stem}.json"),
            None => url.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexEntry, IndexKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_file_name() {
        assert_eq!(JsonEmitter.file_name("pkg.Thing.html"), "pkg.Thing.json");
        assert_eq!(JsonEmitter.file_name("README"), "README");
    }

    #[test]
    fn test_json_index_document() {
        let index = SiteIndex {
            classes: vec![IndexEntry::new(IndexKind::Module, "pkg", "pkg.html", "Pkg.")],
            pages: vec![],
        };
        let bytes = JsonEmitter
            .emit(Template::ClassIndex, RenderData::Index(&index))
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["template"], "class_index");
        assert_eq!(json["index"]["classes"][0]["url"], "pkg.html");
        assert_eq!(json["index"]["classes"][0]["kind"], "module");
    }

    #[test]
    fn test_template_names() {
        assert_eq!(Template::ModuleIndex.to_string(), "module_index");
        assert!(Template::PageIndex.is_index());
        assert!(!Template::Class.is_index());
    }
}
