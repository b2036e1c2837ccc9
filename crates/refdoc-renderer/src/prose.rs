//! Markdown to HTML rendering for authored prose.

use std::fmt::Write;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::util::{escape_html, heading_level_to_num};

/// Result of rendering a piece of prose.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedProse {
    /// Rendered HTML fragment.
    pub html: String,
    /// Text of the first H1 heading. The heading itself is not part of `html`.
    pub title: Option<String>,
    /// Image URLs referenced by the prose, in order of appearance.
    pub resources: Vec<String>,
}

/// Renders Markdown prose into HTML fragments.
#[derive(Clone, Debug)]
pub struct ProseRenderer {
    gfm: bool,
}

impl ProseRenderer {
    /// Create a renderer with GitHub Flavored Markdown enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable tables, strikethrough and task lists.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render block-level prose.
    #[must_use]
    pub fn render(&self, text: &str) -> RenderedProse {
        let mut writer = HtmlWriter::new(false);
        writer.run(Parser::new_ext(text, self.parser_options()));
        writer.finish()
    }

    /// Render prose meant for a single line, such as a summary.
    ///
    /// Paragraphs are not wrapped in `<p>`.
    #[must_use]
    pub fn render_inline(&self, text: &str) -> RenderedProse {
        let mut writer = HtmlWriter::new(true);
        writer.run(Parser::new_ext(text, self.parser_options()));
        writer.finish()
    }
}

impl Default for ProseRenderer {
    fn default() -> Self {
        Self::new()
    }
}

struct HtmlWriter {
    output: String,
    inline: bool,
    title: Option<String>,
    /// Text of the first H1 while it is being captured.
    title_buffer: Option<String>,
    code_block: Option<String>,
    image: Option<ImageState>,
    table_alignments: Vec<Alignment>,
    table_cell: usize,
    in_table_head: bool,
    resources: Vec<String>,
}

struct ImageState {
    src: String,
    title: String,
    alt: String,
}

impl HtmlWriter {
    fn new(inline: bool) -> Self {
        Self {
            output: String::with_capacity(1024),
            inline,
            title: None,
            title_buffer: None,
            code_block: None,
            image: None,
            table_alignments: Vec::new(),
            table_cell: 0,
            in_table_head: false,
            resources: Vec::new(),
        }
    }

    fn run<'a>(&mut self, events: impl Iterator<Item = Event<'a>>) {
        for event in events {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) => self.text(&text),
                Event::Code(code) => {
                    if let Some(buffer) = &mut self.title_buffer {
                        buffer.push_str(&code);
                    } else {
                        let _ = write!(self.output, "<code>{}</code>", escape_html(&code));
                    }
                }
                Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
                Event::SoftBreak => self.text("\n"),
                Event::HardBreak => self.output.push_str("<br />\n"),
                Event::Rule => self.output.push_str("<hr />\n"),
                Event::TaskListMarker(checked) => {
                    let checked = if checked { " checked=\"\"" } else { "" };
                    let _ = write!(
                        self.output,
                        "<input disabled=\"\" type=\"checkbox\"{checked}/> "
                    );
                }
                Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
            }
        }
    }

    fn finish(self) -> RenderedProse {
        RenderedProse {
            html: self.output.trim_end().to_owned(),
            title: self.title,
            resources: self.resources,
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.inline {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                let level = heading_level_to_num(level);
                if level == 1 && self.title.is_none() && self.title_buffer.is_none() {
                    self.title_buffer = Some(String::new());
                } else {
                    let _ = write!(self.output, "<h{level}>");
                }
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                match kind {
                    CodeBlockKind::Fenced(info) if !info.is_empty() => {
                        let lang = info.split_whitespace().next().unwrap_or_default();
                        let _ = write!(
                            self.output,
                            "<pre><code class=\"language-{}\">",
                            escape_html(lang)
                        );
                    }
                    _ => self.output.push_str("<pre><code>"),
                }
                self.code_block = Some(String::new());
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>\n"),
            Tag::List(Some(start)) => {
                let _ = writeln!(self.output, "<ol start=\"{start}\">");
            }
            Tag::List(None) => self.output.push_str("<ul>\n"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.table_cell = 0;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table_cell = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let tag = if self.in_table_head { "th" } else { "td" };
                let style = match self.table_alignments.get(self.table_cell) {
                    Some(Alignment::Left) => " style=\"text-align: left\"",
                    Some(Alignment::Center) => " style=\"text-align: center\"",
                    Some(Alignment::Right) => " style=\"text-align: right\"",
                    Some(Alignment::None) | None => "",
                };
                let _ = write!(self.output, "<{tag}{style}>");
            }
            Tag::Emphasis => self.output.push_str("<em>"),
            Tag::Strong => self.output.push_str("<strong>"),
            Tag::Strikethrough => self.output.push_str("<s>"),
            Tag::Superscript => self.output.push_str("<sup>"),
            Tag::Subscript => self.output.push_str("<sub>"),
            Tag::Link { dest_url, .. } => {
                let _ = write!(self.output, "<a href=\"{}\">", escape_html(&dest_url));
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.resources.push(dest_url.to_string());
                self.image = Some(ImageState {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                });
            }
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.inline {
                    self.output.push('\n');
                } else {
                    self.output.push_str("</p>\n");
                }
            }
            TagEnd::Heading(level) => {
                if let Some(title) = self.title_buffer.take() {
                    self.title = Some(title.trim().to_owned());
                } else {
                    let _ = writeln!(self.output, "</h{}>", heading_level_to_num(level));
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => {
                let code = self.code_block.take().unwrap_or_default();
                let _ = writeln!(self.output, "{}</code></pre>", escape_html(&code));
            }
            TagEnd::List(true) => self.output.push_str("</ol>\n"),
            TagEnd::List(false) => self.output.push_str("</ul>\n"),
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::Table => self.output.push_str("</tbody></table>\n"),
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output
                    .push_str(if self.in_table_head { "</th>" } else { "</td>" });
                self.table_cell += 1;
            }
            TagEnd::Emphasis => self.output.push_str("</em>"),
            TagEnd::Strong => self.output.push_str("</strong>"),
            TagEnd::Strikethrough => self.output.push_str("</s>"),
            TagEnd::Superscript => self.output.push_str("</sup>"),
            TagEnd::Subscript => self.output.push_str("</sub>"),
            TagEnd::Link => self.output.push_str("</a>"),
            TagEnd::Image => {
                if let Some(image) = self.image.take() {
                    let _ = write!(
                        self.output,
                        "<img src=\"{}\" alt=\"{}\"",
                        escape_html(&image.src),
                        escape_html(&image.alt)
                    );
                    if !image.title.is_empty() {
                        let _ = write!(self.output, " title=\"{}\"", escape_html(&image.title));
                    }
                    self.output.push_str(" />");
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code_block {
            code.push_str(text);
        } else if let Some(image) = &mut self.image {
            image.alt.push_str(text);
        } else if let Some(title) = &mut self.title_buffer {
            title.push_str(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_paragraphs() {
        let result = ProseRenderer::new().render("First *one*.\n\nSecond **two**.");
        assert_eq!(
            result.html,
            "<p>First <em>one</em>.</p>\n<p>Second <strong>two</strong>.</p>"
        );
        assert_eq!(result.title, None);
    }

    #[test]
    fn test_first_h1_becomes_title() {
        let result = ProseRenderer::new().render("# Getting started\n\nText.\n\n# Other");
        assert_eq!(result.title.as_deref(), Some("Getting started"));
        assert_eq!(result.html, "<p>Text.</p>\n<h1>Other</h1>");
    }

    #[test]
    fn test_inline_has_no_paragraph() {
        let result = ProseRenderer::new().render_inline("A `tiny` summary");
        assert_eq!(result.html, "A <code>tiny</code> summary");
    }

    #[test]
    fn test_images_are_collected() {
        let result = ProseRenderer::new()
            .render("![Logo](img/logo.png \"The logo\")\n\n![](https://example.com/x.svg)");
        assert_eq!(
            result.resources,
            vec!["img/logo.png".to_owned(), "https://example.com/x.svg".to_owned()]
        );
        assert!(
            result
                .html
                .contains("<img src=\"img/logo.png\" alt=\"Logo\" title=\"The logo\" />")
        );
    }

    #[test]
    fn test_code_block_is_escaped() {
        let result = ProseRenderer::new().render("```python\nif a < b:\n    pass\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-python\">if a &lt; b:\n    pass\n</code></pre>"
        );
    }

    #[test]
    fn test_table_alignment() {
        let result = ProseRenderer::new().render("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            result.html,
            "<table><thead><tr><th style=\"text-align: left\">a</th>\
             <th style=\"text-align: right\">b</th></tr></thead><tbody>\
             <tr><td style=\"text-align: left\">1</td>\
             <td style=\"text-align: right\">2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_gfm_disabled() {
        let result = ProseRenderer::new().with_gfm(false).render("~~gone~~");
        assert_eq!(result.html, "<p>~~gone~~</p>");
    }
}
