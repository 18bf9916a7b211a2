//! Markdown rendering with heading anchors, table of contents and syntax
//! highlighting

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use regex::{Captures, Regex};
use syntect::parsing::SyntaxSet;

use crate::helpers::{decode_entities, html_escape};

/// A body line holding only this tag is replaced by the table of contents
pub const TOC_MARKER: &str = "<TableOfContents />";

/// URL prefix of images placed with `<Image src="..." />`
pub const IMAGE_PREFIX: &str = "/image/";

/// Width and height of an `<Image />` without explicit dimensions
const DEFAULT_IMAGE_SIZE: &str = "500";

lazy_static! {
    static ref IMAGE_TAG: Regex =
        Regex::new(r#"<Image((?:\s+[A-Za-z][\w-]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{[^}]*\}))?)*)\s*/?>"#)
            .unwrap();
    static ref IMAGE_ATTR: Regex =
        Regex::new(r#"([A-Za-z][\w-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|\{\s*["']?([^}"']*)["']?\s*\}))?"#)
            .unwrap();
}

/// Turns a markup body into HTML
pub trait MarkupCompiler {
    fn compile(&self, markup: &str) -> Result<RenderedMarkup>;
}

/// Output of a [`MarkupCompiler`]
#[derive(Debug, Clone, Default)]
pub struct RenderedMarkup {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// A heading found while rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub title: String,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, highlight: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            highlight,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<RenderedMarkup> {
        // Front-matter is split off before we get here
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut headings: Vec<Heading> = Vec::new();

        let mut code_block: Option<(Option<String>, String)> = None;
        let mut heading: Option<(Tag, Vec<Event>, String)> = None;

        for event in parser {
            if let Some((_, code)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, code)) = code_block.take() {
                            let highlighted = self.highlight_code(&code, lang.as_deref());
                            events.push(Event::Html(CowStr::from(highlighted)));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            if let Some((_, inner, text)) = heading.as_mut() {
                match event {
                    Event::End(TagEnd::Heading(_)) => {
                        if let Some((start, inner, text)) = heading.take() {
                            let (start, entry) = anchor_heading(start, &text, &headings);
                            headings.push(entry);
                            events.push(Event::Start(start));
                            events.extend(inner);
                            events.push(event);
                        }
                    }
                    event => {
                        if let Event::Text(t) | Event::Code(t) = &event {
                            text.push_str(t);
                        }
                        inner.push(event);
                    }
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.split_whitespace().next().unwrap_or("").to_string();
                            if lang.is_empty() {
                                None
                            } else {
                                Some(lang)
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(tag @ Tag::Heading { .. }) => {
                    heading = Some((tag, Vec::new(), String::new()));
                }
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        if html_output.contains(TOC_MARKER) {
            html_output = html_output.replace(TOC_MARKER, &toc(&headings));
        }
        if html_output.contains("<Image") {
            html_output = rewrite_images(&html_output);
        }

        Ok(RenderedMarkup {
            html: html_output,
            headings,
        })
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let class = html_escape(lang);
        let plain = || {
            format!(
                r#"<pre class="language-{0}"><code class="language-{0}">{1}</code></pre>"#,
                class,
                html_escape(code)
            )
        };

        if !self.highlight {
            return plain();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = match self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        {
            Some(theme) => theme,
            None => return plain(),
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => format!(
                r#"<figure class="highlight language-{}">{}</figure>"#,
                class, highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                plain()
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupCompiler for MarkdownRenderer {
    fn compile(&self, markup: &str) -> Result<RenderedMarkup> {
        self.render(markup)
    }
}

/// Give a heading a unique slug id unless it already has one
fn anchor_heading<'a>(start: Tag<'a>, text: &str, seen: &[Heading]) -> (Tag<'a>, Heading) {
    let Tag::Heading {
        level,
        id,
        classes,
        attrs,
    } = start
    else {
        unreachable!("anchor_heading is only called with heading tags");
    };

    let id = match id {
        Some(id) => id.to_string(),
        None => unique_slug(text, seen),
    };

    let entry = Heading {
        level: level as u8,
        id: id.clone(),
        title: text.trim().to_string(),
    };

    let tag = Tag::Heading {
        level,
        id: Some(CowStr::from(id)),
        classes,
        attrs,
    };
    (tag, entry)
}

/// Slugify a heading, suffixing `-1`, `-2`, ... on collisions
fn unique_slug(text: &str, seen: &[Heading]) -> String {
    let base = slug::slugify(text);
    let base = if base.is_empty() {
        "section".to_string()
    } else {
        base
    };

    let mut candidate = base.clone();
    let mut n = 1;
    while seen.iter().any(|h| h.id == candidate) {
        candidate = format!("{}-{}", base, n);
        n += 1;
    }
    candidate
}

/// Replace `<Image />` components with a flex wrapper around an `<img>`
///
/// `src` is served from [`IMAGE_PREFIX`]; width and height default to 500 and
/// a `center` attribute centers the image.
pub fn rewrite_images(html: &str) -> String {
    IMAGE_TAG
        .replace_all(html, |caps: &Captures| image_html(&caps[1]))
        .into_owned()
}

fn image_html(attrs: &str) -> String {
    let mut src = String::new();
    let mut alt = String::new();
    let mut width = DEFAULT_IMAGE_SIZE.to_string();
    let mut height = DEFAULT_IMAGE_SIZE.to_string();
    let mut center = false;

    for caps in IMAGE_ATTR.captures_iter(attrs) {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| decode_entities(m.as_str().trim()));
        match (&caps[1], value) {
            ("src", Some(v)) => src = v,
            ("alt", Some(v)) => alt = v,
            ("width", Some(v)) if !v.is_empty() => width = v,
            ("height", Some(v)) if !v.is_empty() => height = v,
            ("center", None) => center = true,
            ("center", Some(v)) => center = v != "false",
            _ => {}
        }
    }

    let style = if center {
        "display: flex; justify-content: center;"
    } else {
        "display: flex;"
    };
    format!(
        r#"<div class="image" style="{}"><img src="{}{}" alt="{}" width="{}" height="{}" loading="lazy"></div>"#,
        style,
        IMAGE_PREFIX,
        html_escape(src.trim_start_matches('/')),
        html_escape(&alt),
        html_escape(&width),
        html_escape(&height)
    )
}

/// Table of contents: h2 entries, each with its h3 children
///
/// h3 headings before the first h2 are left out.
pub fn toc(headings: &[Heading]) -> String {
    let mut entries: Vec<(&Heading, Vec<&Heading>)> = Vec::new();
    for heading in headings {
        match heading.level {
            2 => entries.push((heading, Vec::new())),
            3 => {
                if let Some((_, children)) = entries.last_mut() {
                    children.push(heading);
                }
            }
            _ => {}
        }
    }

    let mut html = String::from(
        r#"<nav aria-label="Table of contents" class="toc"><h3>Table of Contents</h3><ul>"#,
    );
    for (heading, children) in entries {
        html.push_str(&toc_link(heading));
        if !children.is_empty() {
            html.push_str("<ul>");
            for child in children {
                html.push_str(&toc_link(child));
                html.push_str("</li>");
            }
            html.push_str("</ul>");
        }
        html.push_str("</li>");
    }
    html.push_str("</ul></nav>");
    html
}

fn toc_link(heading: &Heading) -> String {
    format!(
        r##"<li><a href="#{}">{}</a>"##,
        heading.id,
        html_escape(&heading.title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(out.html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(out.html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("## Setup\n\n## Setup\n\n### `code` here").unwrap();
        let ids: Vec<_> = out.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1", "code-here"]);
        assert!(out.html.contains(r#"<h2 id="setup-1">"#));
        assert!(out.html.contains("<code>code</code>"));
    }

    #[test]
    fn test_explicit_heading_id_is_kept() {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("## Intro {#start}").unwrap();
        assert_eq!(out.headings[0].id, "start");
        assert_eq!(out.headings[0].title, "Intro");
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(out.html.contains("highlight language-rust"));
        assert!(!out.html.contains("```"));
    }

    #[test]
    fn test_plain_code_block() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", false);
        let out = renderer.render("```html\n<b>x</b>\n```").unwrap();
        assert!(out
            .html
            .contains(r#"<code class="language-html">&lt;b&gt;x&lt;/b&gt;"#));
    }

    #[test]
    fn test_table_of_contents() {
        let renderer = MarkdownRenderer::new();
        let markdown = "### Orphan\n\n<TableOfContents />\n\n## First\n\n### Child\n\n## Second\n";
        let out = renderer.render(markdown).unwrap();
        assert!(!out.html.contains(TOC_MARKER));
        assert!(out.html.contains(r##"<li><a href="#first">First</a><ul><li><a href="#child">Child</a></li></ul></li>"##));
        assert!(out.html.contains(r##"<li><a href="#second">Second</a></li>"##));
        assert!(!out.html.contains(r##"href="#orphan""##));
    }

    #[test]
    fn test_image_component() {
        let renderer = MarkdownRenderer::new();
        let markdown = "Intro\n\n<Image src=\"diagram.png\" alt=\"A diagram\" />\n\n<Image src=\"wide.png\" alt=\"Wide\" width={800} height={300} center />\n";
        let out = renderer.render(markdown).unwrap();
        assert!(!out.html.contains("<Image"));
        assert!(out.html.contains(
            r#"<div class="image" style="display: flex;"><img src="/image/diagram.png" alt="A diagram" width="500" height="500" loading="lazy"></div>"#
        ));
        assert!(out.html.contains(
            r#"<div class="image" style="display: flex; justify-content: center;"><img src="/image/wide.png" alt="Wide" width="800" height="300" loading="lazy"></div>"#
        ));
    }

    #[test]
    fn test_image_in_code_is_untouched() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", false);
        let out = renderer.render("`<Image src=\"a.png\" />`").unwrap();
        assert!(out.html.contains("&lt;Image src=&quot;a.png&quot; /&gt;"));
        assert!(!out.html.contains("/image/a.png"));
    }

    #[test]
    fn test_rewrite_images_escapes_attributes() {
        let html = rewrite_images(r#"<Image src="/a b.png" alt='Tom "&amp;" Jerry' center={false} />"#);
        assert_eq!(
            html,
            r#"<div class="image" style="display: flex;"><img src="/image/a b.png" alt="Tom &quot;&amp;&quot; Jerry" width="500" height="500" loading="lazy"></div>"#
        );
    }

    #[test]
    fn test_code_fence_language_is_escaped() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", false);
        let out = renderer.render("```a\"b\nx\n```").unwrap();
        assert!(out.html.contains(r#"class="language-a&quot;b""#));
        assert!(!out.html.contains(r#"language-a"b"#));
    }

    #[test]
    fn test_toc_empty() {
        assert_eq!(
            toc(&[]),
            r#"<nav aria-label="Table of contents" class="toc"><h3>Table of Contents</h3><ul></ul></nav>"#
        );
    }
}
