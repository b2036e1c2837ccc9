//! Run orchestration: walks every root module, renders authored pages and
//! emits the index pages.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use refdoc_inspect::ObjectGraph;
use refdoc_renderer::ProseRenderer;
use serde::Serialize;

use crate::authored::AuthoredPage;
use crate::emit::{Emitter, JsonEmitter, RenderData, Template};
use crate::error::SiteError;
use crate::external::{ExternalDocs, UnusedDocs};
use crate::extract::Extractor;
use crate::hooks::Hooks;
use crate::html::{HtmlEmitter, SiteInfo};
use crate::index::{IndexEntry, SiteIndex, mark_nested_modules};
use crate::page::{PageBody, PageDescriptor};
use crate::path::BreadcrumbItem;
use crate::sink::OutputSink;
use crate::walker::{PageSink, PageWalker};

/// Output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

impl OutputFormat {
    fn emitter(self, site: SiteInfo) -> Box<dyn Emitter> {
        match self {
            Self::Html => Box::new(HtmlEmitter::new(site)),
            Self::Json => Box::new(JsonEmitter),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Html => "html",
            Self::Json => "json",
        })
    }
}

/// Unknown output format name.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown output format: {0} (expected html or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(UnknownFormat(other.to_owned())),
        }
    }
}

/// Settings of a generation run.
#[derive(Clone, Debug, Default)]
pub struct SiteSettings {
    /// Root modules to document, in order.
    pub roots: Vec<String>,
    pub site: SiteInfo,
    /// Support native extension modules without reflection data.
    pub native_compat: bool,
    pub format: OutputFormat,
}

/// Outcome of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// One module tree per root.
    pub class_index: Vec<IndexEntry>,
    pub page_index: Vec<IndexEntry>,
    pub files_written: usize,
    /// External documentation that matched nothing.
    pub unused_docs: UnusedDocs,
    /// Resources referenced by rendered prose, to be shipped with the site.
    pub resources: BTreeSet<String>,
}

/// Generates a documentation site from an object graph.
///
/// # Example
///
/// ```
/// use refdoc_inspect::{Module, ObjectGraphBuilder};
/// use refdoc_site::{ExternalDocs, Generator, MemorySink, SiteSettings};
///
/// let mut builder = ObjectGraphBuilder::new();
/// builder.add_root("pkg", Module { name: "pkg".to_owned(), ..Module::default() });
/// let graph = builder.build().unwrap();
///
/// let settings = SiteSettings { roots: vec!["pkg".to_owned()], ..SiteSettings::default() };
/// let mut sink = MemorySink::new();
/// let report = Generator::new(settings, graph, ExternalDocs::new()).run(&mut sink).unwrap();
///
/// assert!(sink.text("pkg.html").is_some());
/// assert_eq!(report.files_written, 5);
/// ```
pub struct Generator {
    settings: SiteSettings,
    graph: ObjectGraph,
    docs: ExternalDocs,
    pages: Vec<AuthoredPage>,
    emitter: Box<dyn Emitter>,
    hooks: Hooks,
}

impl Generator {
    #[must_use]
    pub fn new(settings: SiteSettings, graph: ObjectGraph, docs: ExternalDocs) -> Self {
        let emitter = settings.format.emitter(settings.site.clone());
        Self {
            settings,
            graph,
            docs,
            pages: Vec::new(),
            emitter,
            hooks: Hooks::new(),
        }
    }

    /// Authored pages, rendered in order after the reference pages.
    #[must_use]
    pub fn with_pages(mut self, pages: Vec<AuthoredPage>) -> Self {
        self.pages = pages;
        self
    }

    /// Replace the emitter selected by the output format.
    #[must_use]
    pub fn with_emitter(mut self, emitter: impl Emitter + 'static) -> Self {
        self.emitter = Box::new(emitter);
        self
    }

    #[must_use]
    pub fn with_pre_page_hook(mut self, hook: impl FnMut() + 'static) -> Self {
        self.hooks.on_pre_page(hook);
        self
    }

    #[must_use]
    pub fn with_post_run_hook(mut self, hook: impl FnMut() + 'static) -> Self {
        self.hooks.on_post_run(hook);
        self
    }

    /// Generate the site into `sink`.
    pub fn run(self, sink: &mut dyn OutputSink) -> Result<BuildReport, SiteError> {
        let Self {
            settings,
            graph,
            docs,
            pages,
            emitter,
            mut hooks,
        } = self;

        hooks.fire_pre_page();

        let mut publisher = Publisher {
            emitter: emitter.as_ref(),
            sink,
            hooks: &mut hooks,
            files_written: 0,
        };

        let mut extractor = Extractor::new(docs, settings.native_compat);
        let mut class_index = Vec::with_capacity(settings.roots.len());
        for root in &settings.roots {
            let entry = PageWalker::new(&graph, &mut extractor, &mut publisher).walk_root(root)?;
            class_index.push(entry);
        }

        let (docs, mut resources) = extractor.into_parts();
        let unused_docs = docs.unused();
        unused_docs.warn();

        let prose = ProseRenderer::new();
        let mut page_index = Vec::new();
        let mut has_home = false;
        for page in &pages {
            tracing::debug!(page = page.name(), "Generating page");
            publisher.begin_page();
            let rendered = page.render(&prose)?;
            has_home |= page.is_home();
            resources.extend(rendered.resources.iter().cloned());
            page_index.extend(rendered.index_entry());
            publisher.finish_page(rendered.page)?;
        }

        mark_nested_modules(&mut class_index);
        let index = SiteIndex {
            classes: class_index,
            pages: page_index,
        };
        for (template, url) in Template::INDEXES {
            publisher.publish(template, RenderData::Index(&index), url)?;
        }

        if !has_home {
            let home = home_page(&settings.site.title);
            publisher.publish(Template::Page, RenderData::Page(&home), &home.url)?;
        }

        let files_written = publisher.files_written;
        hooks.fire_post_run();

        tracing::debug!(files = files_written, "Site generated");
        Ok(BuildReport {
            class_index: index.classes,
            page_index: index.pages,
            files_written,
            unused_docs,
            resources,
        })
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("settings", &self.settings)
            .field("pages", &self.pages.len())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Empty home page used when no authored page takes its place.
fn home_page(title: &str) -> PageDescriptor {
    PageDescriptor {
        url: "index.html".to_owned(),
        breadcrumb: vec![BreadcrumbItem {
            title: title.to_owned(),
            url: "index.html".to_owned(),
        }],
        prefix_wbr: String::new(),
        summary: String::new(),
        content: None,
        body: PageBody::Page,
    }
}

/// Emits pages into the output sink as the walk produces them.
struct Publisher<'a> {
    emitter: &'a dyn Emitter,
    sink: &'a mut dyn OutputSink,
    hooks: &'a mut Hooks,
    files_written: usize,
}

impl Publisher<'_> {
    fn publish(
        &mut self,
        template: Template,
        data: RenderData<'_>,
        url: &str,
    ) -> Result<(), SiteError> {
        let mut contents = self.emitter.emit(template, data)?;
        contents.push(b'\n');
        let name = self.emitter.file_name(url);
        self.sink.write(&name, &contents)?;
        self.files_written += 1;
        Ok(())
    }
}

impl PageSink for Publisher<'_> {
    fn begin_page(&mut self) {
        self.hooks.fire_pre_page();
    }

    fn finish_page(&mut self, page: PageDescriptor) -> Result<(), SiteError> {
        self.publish(Template::for_page(&page), RenderData::Page(&page), &page.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexKind;
    use crate::sink::MemorySink;
    use pretty_assertions::assert_eq;
    use refdoc_inspect::{Class, Module, Object, ObjectGraphBuilder};
    use std::cell::Cell;
    use std::rc::Rc;

    fn package(name: &str) -> Module {
        Module {
            name: name.to_owned(),
            package: Some(name.to_owned()),
            doc: Some(format!("The {name} package.")),
            ..Module::default()
        }
    }

    /// `pkg` with a `pkg.sub` submodule holding one class.
    fn graph() -> ObjectGraph {
        let mut builder = ObjectGraphBuilder::new();
        let pkg = builder.add_root("pkg", package("pkg"));
        let sub = builder.add(Object::Module(Module {
            name: "pkg.sub".to_owned(),
            package: Some("pkg".to_owned()),
            doc: Some("Submodule.".to_owned()),
            ..Module::default()
        }));
        let widget = builder.add(Object::Class(Class {
            name: "Widget".to_owned(),
            module: "pkg.sub".to_owned(),
            doc: Some("A widget.".to_owned()),
            ..Class::default()
        }));
        builder.attach(pkg, "sub", sub).attach(sub, "Widget", widget);
        builder.build().unwrap()
    }

    fn settings(format: OutputFormat) -> SiteSettings {
        SiteSettings {
            roots: vec!["pkg".to_owned()],
            site: SiteInfo {
                title: "Widgets".to_owned(),
                ..SiteInfo::default()
            },
            native_compat: false,
            format,
        }
    }

    #[test]
    fn test_run_writes_all_files() {
        let mut sink = MemorySink::new();
        let report = Generator::new(settings(OutputFormat::Html), graph(), ExternalDocs::new())
            .run(&mut sink)
            .unwrap();

        assert_eq!(
            sink.names().collect::<Vec<_>>(),
            vec![
                "classes.html",
                "index.html",
                "modules.html",
                "pages.html",
                "pkg.html",
                "pkg.sub.Widget.html",
                "pkg.sub.html",
            ]
        );
        assert_eq!(report.files_written, 7);
        for name in sink.names() {
            let text = sink.text(name).unwrap();
            assert!(text.ends_with("</html>\n"), "{name} lacks trailing newline");
        }
        assert!(sink.text("index.html").unwrap().contains("Widgets"));
    }

    #[test]
    fn test_class_index_tree() {
        let mut sink = MemorySink::new();
        let report = Generator::new(settings(OutputFormat::Html), graph(), ExternalDocs::new())
            .run(&mut sink)
            .unwrap();

        let root = &report.class_index[0];
        assert_eq!(root.name, "pkg");
        assert!(root.has_nestable_children);
        let sub = &root.children[0];
        assert_eq!(sub.kind, IndexKind::Module);
        assert!(!sub.has_nestable_children);
        assert_eq!(sub.children[0].name, "Widget");
        assert_eq!(sub.children[0].url, "pkg.sub.Widget.html");
    }

    #[test]
    fn test_hooks_fire_per_page() {
        let pre = Rc::new(Cell::new(0));
        let post = Rc::new(Cell::new(0));
        let pre_count = Rc::clone(&pre);
        let post_count = Rc::clone(&post);

        let mut sink = MemorySink::new();
        Generator::new(settings(OutputFormat::Html), graph(), ExternalDocs::new())
            .with_pages(vec![AuthoredPage::new("guide", "# Guide")])
            .with_pre_page_hook(move || pre_count.set(pre_count.get() + 1))
            .with_post_run_hook(move || post_count.set(post_count.get() + 1))
            .run(&mut sink)
            .unwrap();

        // Once for the run, then pkg, pkg.sub, Widget and the guide.
        assert_eq!(pre.get(), 5);
        assert_eq!(post.get(), 1);
    }

    #[test]
    fn test_authored_home_page_replaces_default() {
        let mut sink = MemorySink::new();
        let report = Generator::new(settings(OutputFormat::Html), graph(), ExternalDocs::new())
            .with_pages(vec![
                AuthoredPage::new("index", "# Welcome\n\nHello."),
                AuthoredPage::new("guide", "# Guide"),
            ])
            .run(&mut sink)
            .unwrap();

        assert!(sink.text("index.html").unwrap().contains("Hello."));
        assert_eq!(report.page_index.len(), 1);
        assert_eq!(report.page_index[0].name, "Guide");
        assert_eq!(report.page_index[0].url, "guide.html");
        assert_eq!(report.files_written, 8);
    }

    #[test]
    fn test_json_output() {
        let mut sink = MemorySink::new();
        Generator::new(settings(OutputFormat::Json), graph(), ExternalDocs::new())
            .run(&mut sink)
            .unwrap();

        let text = sink.text("pkg.sub.Widget.json").unwrap();
        assert!(text.ends_with('\n'));
        let json: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(json["template"], "class");
        assert_eq!(json["page"]["url"], "pkg.sub.Widget.html");
        assert!(sink.text("classes.json").is_some());
        assert!(sink.text("index.json").is_some());
    }

    #[test]
    fn test_unused_docs_and_resources_reported() {
        let docs = ExternalDocs::from_yaml(
            "modules:\n  pkg:\n    content: See ![arch](arch.png).\n  pkg.gone:\n    summary: Stale.\n",
        )
        .unwrap();
        let mut sink = MemorySink::new();
        let report = Generator::new(settings(OutputFormat::Html), graph(), docs)
            .with_pages(vec![AuthoredPage::new("guide", "![shot](shot.png)")])
            .run(&mut sink)
            .unwrap();

        assert_eq!(report.unused_docs.modules, vec!["pkg.gone".to_owned()]);
        assert_eq!(
            report.resources.into_iter().collect::<Vec<_>>(),
            vec!["arch.png".to_owned(), "shot.png".to_owned()]
        );
    }

    #[test]
    fn test_unknown_root_is_fatal() {
        let mut settings = settings(OutputFormat::Html);
        settings.roots.push("missing".to_owned());

        let mut sink = MemorySink::new();
        let err = Generator::new(settings, graph(), ExternalDocs::new())
            .run(&mut sink)
            .unwrap_err();
        assert!(matches!(err, SiteError::UnknownModule(name) if name == "missing"));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(
            "pdf".parse::<OutputFormat>(),
            Err(UnknownFormat("pdf".to_owned()))
        );
        assert_eq!(OutputFormat::Html.to_string(), "html");
    }
}
