//! HTML templates for reference pages and index pages.
//!
//! Summaries, page content, default values and enum values arrive already
//! escaped or rendered. Names and type names are escaped here.

use std::fmt::Write;

use refdoc_renderer::escape_html;

use crate::emit::{EmitError, Emitter, RenderData, Template};
use crate::index::{IndexEntry, IndexKind, SiteIndex};
use crate::page::{ClassMembers, ModuleMembers, PageBody, PageDescriptor};
use crate::record::{
    DataRecord, EnumRecord, FunctionRecord, LinkRecord, ParamRecord, PropertyRecord,
};

/// Project-wide values shown on every page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteInfo {
    pub title: String,
    pub subtitle: Option<String>,
    /// Link target of the project title; the home page when absent.
    pub main_url: Option<String>,
    /// Depth up to which module trees in the class index start expanded.
    pub class_index_expand_levels: usize,
    /// Whether classes with inner classes start expanded.
    pub class_index_expand_inner: bool,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "My Python Project".to_owned(),
            subtitle: None,
            main_url: None,
            class_index_expand_levels: 1,
            class_index_expand_inner: false,
        }
    }
}

/// Emits standalone HTML pages.
#[derive(Clone, Debug, Default)]
pub struct HtmlEmitter {
    site: SiteInfo,
}

impl HtmlEmitter {
    #[must_use]
    pub fn new(site: SiteInfo) -> Self {
        Self { site }
    }

    fn render_page(&self, page: &PageDescriptor) -> String {
        let mut html = String::with_capacity(8192);
        let title = page
            .breadcrumb
            .iter()
            .map(|item| item.title.as_str())
            .collect::<Vec<_>>()
            .join(".");
        self.render_head(&mut html, &title);

        html.push_str("<article>\n");
        render_heading(&mut html, page);
        if !page.summary.is_empty() {
            let _ = writeln!(html, "<p class=\"summary\">{}</p>", page.summary);
        }
        if let Some(content) = &page.content {
            html.push_str(content);
            html.push('\n');
        }

        match &page.body {
            PageBody::Module(members) => render_module_members(&mut html, members),
            PageBody::Class(members) => render_class_members(&mut html, members),
            PageBody::Page => {}
        }

        html.push_str("</article>\n");
        render_foot(&mut html);
        html
    }

    fn render_index(&self, template: Template, index: &SiteIndex) -> String {
        let mut html = String::with_capacity(4096);
        let title = match template {
            Template::ModuleIndex => "Modules",
            Template::ClassIndex => "Classes",
            _ => "Pages",
        };
        self.render_head(&mut html, title);

        html.push_str("<article>\n");
        let _ = writeln!(html, "<h1>{title}</h1>");
        html.push_str("<ul class=\"index\">\n");
        match template {
            Template::PageIndex => {
                for entry in &index.pages {
                    render_index_entry(&mut html, entry);
                    html.push_str("</li>\n");
                }
            }
            _ => self.render_index_tree(&mut html, &index.classes, template, 0),
        }
        html.push_str("</ul>\n</article>\n");
        render_foot(&mut html);
        html
    }

    fn render_index_tree(
        &self,
        html: &mut String,
        entries: &[IndexEntry],
        template: Template,
        depth: usize,
    ) {
        for entry in entries {
            if template == Template::ModuleIndex && entry.kind != IndexKind::Module {
                continue;
            }
            let children_shown = match template {
                Template::ModuleIndex => entry.has_nestable_children,
                _ => !entry.children.is_empty(),
            };

            render_index_entry(html, entry);
            if children_shown {
                let expanded = match entry.kind {
                    IndexKind::Module => depth < self.site.class_index_expand_levels,
                    _ => self.site.class_index_expand_inner,
                };
                let _ = writeln!(
                    html,
                    "<ul class=\"{}\">",
                    if expanded { "expanded" } else { "collapsed" }
                );
                self.render_index_tree(html, &entry.children, template, depth + 1);
                html.push_str("</ul>\n");
            }
            html.push_str("</li>\n");
        }
    }

    fn render_head(&self, html: &mut String, title: &str) {
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        let _ = writeln!(
            html,
            "<title>{} | {}</title>",
            escape_html(title),
            escape_html(&self.site.title)
        );
        html.push_str("</head>\n<body>\n<header>\n");
        let home = self.site.main_url.as_deref().unwrap_or("index.html");
        let _ = write!(
            html,
            "<a class=\"project\" href=\"{}\">{}</a>",
            escape_html(home),
            escape_html(&self.site.title)
        );
        if let Some(subtitle) = &self.site.subtitle {
            let _ = write!(html, " <span class=\"subtitle\">{}</span>", escape_html(subtitle));
        }
        html.push_str("\n<nav>\n");
        html.push_str("<a href=\"pages.html\">Pages</a>\n");
        html.push_str("<a href=\"modules.html\">Modules</a>\n");
        html.push_str("<a href=\"classes.html\">Classes</a>\n");
        html.push_str("</nav>\n</header>\n");
    }
}

impl Emitter for HtmlEmitter {
    fn emit(&self, template: Template, data: RenderData<'_>) -> Result<Vec<u8>, EmitError> {
        let html = match (template.is_index(), data) {
            (false, RenderData::Page(page)) => self.render_page(page),
            (true, RenderData::Index(index)) => self.render_index(template, index),
            (_, RenderData::Page(_)) => {
                return Err(EmitError::Unsupported {
                    template,
                    data: "page",
                });
            }
            (_, RenderData::Index(_)) => {
                return Err(EmitError::Unsupported {
                    template,
                    data: "index",
                });
            }
        };
        Ok(html.into_bytes())
    }
}

fn render_foot(html: &mut String) {
    html.push_str("</body>\n</html>");
}

/// Page heading: parent segments as breadcrumb links, then the page name.
fn render_heading(html: &mut String, page: &PageDescriptor) {
    html.push_str("<h1>");
    if let Some((last, parents)) = page.breadcrumb.split_last() {
        for item in parents {
            let _ = write!(
                html,
                "<span class=\"breadcrumb\"><a href=\"{}\">{}</a>.</span>",
                escape_html(&item.url),
                escape_html(&item.title)
            );
        }
        html.push_str(&escape_html(&last.title));
    }
    html.push_str("</h1>\n");
}

fn section_start(html: &mut String, id: &str, title: &str) {
    let _ = writeln!(html, "<section id=\"{id}\">\n<h2>{title}</h2>\n<dl>");
}

fn section_end(html: &mut String) {
    html.push_str("</dl>\n</section>\n");
}

fn render_links(html: &mut String, id: &str, title: &str, links: &[LinkRecord], kind: &str) {
    if links.is_empty() {
        return;
    }
    section_start(html, id, title);
    for link in links {
        let _ = writeln!(
            html,
            "<dt>{kind} <a href=\"{}\">{}</a></dt>\n<dd>{}</dd>",
            escape_html(&link.url),
            escape_html(&link.name),
            link.summary
        );
    }
    section_end(html);
}

fn render_enums(html: &mut String, enums: &[EnumRecord]) {
    if enums.is_empty() {
        return;
    }
    section_start(html, "enums", "Enums");
    for record in enums {
        html.push_str("<dt>class ");
        html.push_str(&escape_html(&record.name));
        if let Some(base) = &record.base {
            let _ = write!(html, "({})", escape_html(base));
        }
        html.push_str(": ");
        let values: Vec<String> = record
            .values
            .iter()
            .map(|v| format!("{} = {}", escape_html(&v.name), v.value))
            .collect();
        html.push_str(&values.join(", "));
        let _ = writeln!(html, "</dt>\n<dd>{}", record.summary);
        if record.has_value_details {
            html.push_str("<table class=\"enum-values\">\n");
            for value in &record.values {
                let _ = writeln!(
                    html,
                    "<tr><th>{}</th><td>{}</td></tr>",
                    escape_html(&value.name),
                    value.summary
                );
            }
            html.push_str("</table>\n");
        }
        html.push_str("</dd>\n");
    }
    section_end(html);
}

fn render_param(param: &ParamRecord) -> String {
    let mut out = escape_html(&param.name);
    if let Some(type_name) = &param.type_name {
        let _ = write!(out, ": {}", escape_html(type_name));
    }
    if let Some(default) = &param.default {
        if param.type_name.is_some() {
            let _ = write!(out, " = {default}");
        } else {
            let _ = write!(out, "={default}");
        }
    }
    out
}

fn render_functions(html: &mut String, id: &str, title: &str, functions: &[FunctionRecord]) {
    if functions.is_empty() {
        return;
    }
    section_start(html, id, title);
    for function in functions {
        let params: Vec<String> = function.params.iter().map(render_param).collect();
        let _ = write!(
            html,
            "<dt><code>def {}({})",
            escape_html(&function.name),
            params.join(", ")
        );
        if let Some(return_type) = &function.return_type {
            let _ = write!(html, " -&gt; {}", escape_html(return_type));
        }
        let _ = writeln!(html, "</code></dt>\n<dd>{}</dd>", function.summary);
    }
    section_end(html);
}

fn render_properties(html: &mut String, properties: &[PropertyRecord]) {
    if properties.is_empty() {
        return;
    }
    section_start(html, "properties", "Properties");
    for property in properties {
        let _ = write!(html, "<dt><code>{}", escape_html(&property.name));
        if let Some(type_name) = &property.type_name {
            let _ = write!(html, ": {}", escape_html(type_name));
        }
        html.push_str("</code>");
        let access = match (property.is_settable, property.is_deletable) {
            (true, true) => "get set del",
            (true, false) => "get set",
            (false, true) => "get del",
            (false, false) => "get",
        };
        let _ = writeln!(
            html,
            " <span class=\"access\">{access}</span></dt>\n<dd>{}</dd>",
            property.summary
        );
    }
    section_end(html);
}

fn render_data(html: &mut String, data: &[DataRecord]) {
    if data.is_empty() {
        return;
    }
    section_start(html, "data", "Data");
    for record in data {
        let _ = write!(html, "<dt><code>{}", escape_html(&record.name));
        if let Some(type_name) = &record.type_name {
            let _ = write!(html, ": {}", escape_html(type_name));
        }
        if let Some(value) = &record.value {
            let _ = write!(html, " = {value}");
        }
        let _ = writeln!(html, "</code></dt>\n<dd>{}</dd>", record.summary);
    }
    section_end(html);
}

fn render_module_members(html: &mut String, members: &ModuleMembers) {
    render_links(html, "packages", "Modules", &members.modules, "module");
    render_links(html, "classes", "Classes", &members.classes, "class");
    render_enums(html, &members.enums);
    render_functions(html, "functions", "Functions", &members.functions);
    render_data(html, &members.data);
}

fn render_class_members(html: &mut String, members: &ClassMembers) {
    render_links(html, "classes", "Classes", &members.classes, "class");
    render_enums(html, &members.enums);
    render_functions(html, "classmethods", "Class methods", &members.classmethods);
    render_functions(html, "staticmethods", "Static methods", &members.staticmethods);
    render_functions(html, "methods", "Methods", &members.methods);
    render_functions(html, "dunder-methods", "Special methods", &members.dunder_methods);
    render_properties(html, &members.properties);
    render_data(html, &members.data);
}

/// Opens an `<li>` for `entry`; the caller closes it.
fn render_index_entry(html: &mut String, entry: &IndexEntry) {
    let kind = match entry.kind {
        IndexKind::Module => "module",
        IndexKind::Class => "class",
        IndexKind::Page => "page",
    };
    let _ = write!(
        html,
        "<li><span class=\"kind\">{kind}</span> <a href=\"{}\">{}</a>",
        escape_html(&entry.url),
        escape_html(&entry.name)
    );
    if !entry.summary.is_empty() {
        let _ = write!(html, " <span class=\"summary\">{}</span>", entry.summary);
    }
    html.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::QualifiedPath;
    use refdoc_inspect::ParameterKind;

    fn emit_page(page: &PageDescriptor) -> String {
        let bytes = HtmlEmitter::default()
            .emit(Template::for_page(page), RenderData::Page(page))
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_class_page() {
        let path = QualifiedPath::root("pkg").child("Greeter");
        let mut members = ClassMembers::default();
        members.push_routine(FunctionRecord {
            name: "greet".to_owned(),
            summary: "Say hi.".to_owned(),
            params: vec![
                ParamRecord {
                    name: "self".to_owned(),
                    type_name: None,
                    default: None,
                    kind: Some(ParameterKind::PositionalOrKeyword),
                },
                ParamRecord {
                    name: "name".to_owned(),
                    type_name: Some("str".to_owned()),
                    default: Some("&#x27;you&#x27;".to_owned()),
                    kind: Some(ParameterKind::PositionalOrKeyword),
                },
            ],
            return_type: Some("str".to_owned()),
            has_complex_params: true,
            has_details: false,
            is_classmethod: false,
            is_staticmethod: false,
        });
        let page = PageDescriptor::for_path(
            &path,
            "Greets.".to_owned(),
            None,
            PageBody::Class(members),
        );

        let html = emit_page(&page);
        assert!(html.contains("<title>pkg.Greeter | My Python Project</title>"));
        assert!(html.contains("<a href=\"pkg.html\">pkg</a>"));
        assert!(html.contains("<section id=\"methods\">"));
        assert!(html.contains("def greet(self, name: str = &#x27;you&#x27;) -&gt; str"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_site_info_in_header() {
        let emitter = HtmlEmitter::new(SiteInfo {
            title: "Lib".to_owned(),
            subtitle: Some("v1 & more".to_owned()),
            main_url: Some("https://example.com".to_owned()),
            ..SiteInfo::default()
        });
        let index = SiteIndex::default();
        let html = String::from_utf8(
            emitter
                .emit(Template::PageIndex, RenderData::Index(&index))
                .unwrap(),
        )
        .unwrap();

        assert!(html.contains("<a class=\"project\" href=\"https://example.com\">Lib</a>"));
        assert!(html.contains("v1 &amp; more"));
    }

    #[test]
    fn test_module_index_skips_classes() {
        let mut pkg = IndexEntry::new(IndexKind::Module, "pkg", "pkg.html", "");
        pkg.children
            .push(IndexEntry::new(IndexKind::Class, "Thing", "pkg.Thing.html", ""));
        let index = SiteIndex {
            classes: vec![pkg],
            pages: vec![],
        };
        let emitter = HtmlEmitter::default();

        let modules = String::from_utf8(
            emitter
                .emit(Template::ModuleIndex, RenderData::Index(&index))
                .unwrap(),
        )
        .unwrap();
        let classes = String::from_utf8(
            emitter
                .emit(Template::ClassIndex, RenderData::Index(&index))
                .unwrap(),
        )
        .unwrap();

        assert!(!modules.contains("pkg.Thing.html"));
        assert!(classes.contains("pkg.Thing.html"));
        assert!(classes.contains("<ul class=\"expanded\">"));
    }

    #[test]
    fn test_mismatched_data_is_rejected() {
        let index = SiteIndex::default();
        let err = HtmlEmitter::default()
            .emit(Template::Class, RenderData::Index(&index))
            .unwrap_err();
        assert!(matches!(err, EmitError::Unsupported { data: "index", .. }));
    }
}
