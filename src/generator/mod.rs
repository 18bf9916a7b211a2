//! Generator module - writes the static site using the built-in templates

use anyhow::{Context as _, Result};
use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use walkdir::WalkDir;

use crate::content::{
    build_homepage_list, build_page, build_post_page, ContentLoader, MarkdownRenderer,
    MarkupCompiler, Page, PostPage, PostRecord, RawSource,
};
use crate::helpers::{full_url_for, is_external, PublishedDate};
use crate::templates::{TemplateRenderer, STYLESHEET};
use crate::Site;

/// Summary of a finished build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub posts: usize,
    pub pages: usize,
    pub assets: usize,
}

/// Static site generator
pub struct Generator<'a> {
    site: &'a Site,
    renderer: TemplateRenderer,
    compiler: Box<dyn MarkupCompiler>,
}

impl<'a> Generator<'a> {
    /// Create a new generator using the markdown renderer from config
    pub fn new(site: &'a Site) -> Result<Self> {
        let highlight = &site.config.highlight;
        let compiler = MarkdownRenderer::with_options(&highlight.theme, highlight.enable);
        Self::with_compiler(site, compiler)
    }

    /// Create a generator with a custom markup compiler
    pub fn with_compiler<C: MarkupCompiler + 'static>(site: &'a Site, compiler: C) -> Result<Self> {
        Ok(Self {
            site,
            renderer: TemplateRenderer::new()?,
            compiler: Box::new(compiler),
        })
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<BuildReport> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        let posts = ContentLoader::new(&self.site.posts_dir).load_sources()?;
        let pages = self.load_pages()?;
        tracing::info!("Loaded {} posts and {} pages", posts.len(), pages.len());

        let assets = self.copy_static_files()?;
        self.write_stylesheet()?;

        let homepage = build_homepage_list(&posts, &self.site.config.blog_dir);
        self.generate_index(&homepage)?;

        for source in &posts {
            let post = build_post_page(source, self.compiler.as_ref(), &self.site.config.blog_dir)?;
            self.generate_post(&post)?;
        }

        for source in &pages {
            let page = build_page(source, self.compiler.as_ref())?;
            self.generate_page(&page)?;
        }

        Ok(BuildReport {
            posts: posts.len(),
            pages: pages.len(),
            assets,
        })
    }

    /// Standalone page sources; a missing pages directory means none
    fn load_pages(&self) -> Result<Vec<RawSource>> {
        if !self.site.pages_dir.exists() {
            tracing::debug!("No pages directory at {:?}", self.site.pages_dir);
            return Ok(Vec::new());
        }
        Ok(ContentLoader::new(&self.site.pages_dir).load_sources()?)
    }

    /// Create a base context with common variables
    fn create_base_context(&self, title: &str, path: &str) -> Context {
        let config = &self.site.config;
        let mut context = Context::new();
        context.insert("config", config);
        context.insert("page_title", &config.page_title(title));
        context.insert("description", &config.description);
        context.insert("og_type", "website");
        context.insert("og_image", &self.absolute_url(&config.favicon));
        context.insert("canonical_url", &full_url_for(config, path));
        context.insert("published_time", "");
        context.insert("current_path", path);
        context.insert("current_year", &chrono::Local::now().year().to_string());
        context.insert("generator_version", env!("CARGO_PKG_VERSION"));
        context
    }

    fn absolute_url(&self, path: &str) -> String {
        if is_external(path) {
            path.to_string()
        } else {
            full_url_for(&self.site.config, path)
        }
    }

    /// Generate the homepage
    fn generate_index(&self, posts: &[PostRecord]) -> Result<()> {
        let mut context = self.create_base_context("", "/");
        context.insert("posts", posts);

        let html = self.renderer.render("index.html", &context)?;
        self.write_output("/", &html)
    }

    /// Generate a post page
    fn generate_post(&self, post: &PostPage) -> Result<()> {
        let mut context = self.create_base_context(&post.title, &post.url);
        context.insert("og_type", "article");
        if let Ok(date) = PublishedDate::parse(&post.published_date) {
            context.insert("published_time", &date.to_iso());
        }
        if !post.description.is_empty() {
            context.insert("description", &post.description);
        }
        context.insert("post", post);

        let html = self.renderer.render("post.html", &context)?;
        self.write_output(&post.url, &html)
    }

    /// Generate a standalone page
    fn generate_page(&self, page: &Page) -> Result<()> {
        let mut context = self.create_base_context(&page.title, &page.url);
        if let Some(description) = page.extra.get("description").and_then(|v| v.as_str()) {
            context.insert("description", description);
        }
        context.insert("page", page);

        let html = self.renderer.render("page.html", &context)?;
        self.write_output(&page.url, &html)
    }

    /// Write `{url}/index.html` under the public directory
    fn write_output(&self, url: &str, html: &str) -> Result<()> {
        let output_path = output_path(&self.site.public_dir, url);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Write the default stylesheet unless a static one exists
    fn write_stylesheet(&self) -> Result<()> {
        let path = self.site.public_dir.join("css").join("style.css");
        if self.site.static_dir.join("css").join("style.css").exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, STYLESHEET).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    /// Copy the static directory into the public directory
    fn copy_static_files(&self) -> Result<usize> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(copied)
    }
}

/// File an URL path is written to
fn output_path(public_dir: &Path, url: &str) -> PathBuf {
    let clean = url.trim_matches('/');
    if clean.is_empty() {
        public_dir.join("index.html")
    } else {
        public_dir.join(clean).join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_site() -> (TempDir, Site) {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        write(
            &base.join("posts/older.mdx"),
            "---\ntitle: Older Post\npublishedDate: 01-01-2020\n---\n\nOld body.",
        );
        write(
            &base.join("posts/newer.md"),
            "---\ntitle: Newer Post\npublishedDate: 15-06-2021\ndescription: Fresh\n---\n\n<TableOfContents />\n\n## Intro\n\nNew body.",
        );
        write(&base.join("posts/notes.txt"), "ignored");
        write(
            &base.join("pages/about.md"),
            "---\ntitle: About\n---\n\nI write code.",
        );
        write(&base.join("static/favicon.png"), "png");

        let mut config = SiteConfig::default();
        config.comments = Some(crate::config::CommentsConfig {
            repo: "me/blog".to_string(),
            ..Default::default()
        });
        let site = Site::with_config(base, config);
        (tmp, site)
    }

    #[test]
    fn test_output_path() {
        let public = Path::new("/out");
        assert_eq!(output_path(public, "/"), PathBuf::from("/out/index.html"));
        assert_eq!(
            output_path(public, "/blog/a"),
            PathBuf::from("/out/blog/a/index.html")
        );
    }

    #[test]
    fn test_generate_site() {
        let (_tmp, site) = sample_site();
        let report = Generator::new(&site).unwrap().generate().unwrap();
        assert_eq!(
            report,
            BuildReport {
                posts: 2,
                pages: 1,
                assets: 1
            }
        );

        let public = &site.public_dir;
        let index = fs::read_to_string(public.join("index.html")).unwrap();
        let newer = index.find("Newer Post").unwrap();
        let older = index.find("Older Post").unwrap();
        assert!(newer < older);
        assert!(index.contains("15 June 2021"));
        assert!(index.contains(r#"href="/blog/newer""#));

        let post = fs::read_to_string(public.join("blog/newer/index.html")).unwrap();
        assert!(post.contains("<title>Newer Post | My Blog</title>"));
        assert!(post.contains(r#"<meta name="description" content="Fresh">"#));
        assert!(post.contains(r#"content="2021-06-15""#));
        assert!(post.contains(r##"<a href="#intro">Intro</a>"##));
        assert!(post.contains(r#"repo="me/blog""#));
        assert!(post.contains("Less than 1 minute read"));

        let about = fs::read_to_string(public.join("about/index.html")).unwrap();
        assert!(about.contains("<h2>About</h2>"));
        assert!(about.contains("I write code."));

        assert!(public.join("favicon.png").exists());
        assert!(public.join("css/style.css").exists());
    }

    #[test]
    fn test_missing_posts_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path(), SiteConfig::default());
        let err = Generator::new(&site).unwrap().generate().unwrap_err();
        assert!(err.downcast_ref::<crate::content::ContentError>().is_some());
    }

    #[test]
    fn test_generated_description_is_escaped_once() {
        let tmp = TempDir::new().unwrap();
        write(
            &tmp.path().join("posts/cartoon.md"),
            "---\ntitle: Cartoon\npublishedDate: 01-02-2021\n---\n\nTom & Jerry <3",
        );
        let site = Site::with_config(tmp.path(), SiteConfig::default());
        Generator::new(&site).unwrap().generate().unwrap();

        let post = fs::read_to_string(site.public_dir.join("blog/cartoon/index.html")).unwrap();
        assert!(post.contains(r#"<meta name="description" content="Tom &amp; Jerry &lt;3">"#));
        assert!(!post.contains("&amp;amp;"));
        assert!(!post.contains("&amp;lt;"));
    }
}
