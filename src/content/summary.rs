//! Post summarizer - turns raw sources into display-ready records

use anyhow::{Context, Result};
use std::cmp::Reverse;

use super::{MarkupCompiler, Page, PostPage, PostRecord, RawSource};
use crate::helpers::{
    estimate_read_time, excerpt, format_display_date, post_url, PublishedDate,
};

/// Length of generated post descriptions
const DESCRIPTION_CHARS: usize = 160;

/// Homepage list, newest first
///
/// Posts whose date cannot be read sort after all others. Ties keep the
/// order of `sources`.
pub fn build_homepage_list(sources: &[RawSource], blog_dir: &str) -> Vec<PostRecord> {
    let mut records: Vec<PostRecord> = sources
        .iter()
        .map(|source| summarize(source, blog_dir))
        .collect();
    sort_by_published_date(&mut records);
    records
}

/// Build the homepage record for one source
pub fn summarize(source: &RawSource, blog_dir: &str) -> PostRecord {
    let fm = &source.front_matter;

    let title = fm.title.clone().unwrap_or_else(|| {
        tracing::warn!("{:?} has no title", source.path);
        String::new()
    });
    let published_date = fm.published_date.clone().unwrap_or_else(|| {
        tracing::warn!("{:?} has no publishedDate", source.path);
        String::new()
    });
    if !published_date.is_empty() {
        if let Err(e) = PublishedDate::parse(&published_date) {
            tracing::warn!("{:?}: {}", source.path, e);
        }
    }

    PostRecord {
        title,
        published_date,
        url: post_url(blog_dir, &source.slug),
        readtime: estimate_read_time(&source.body),
    }
}

/// Sort records by published date, newest first
pub fn sort_by_published_date(records: &mut [PostRecord]) {
    // sort_by_cached_key is stable
    records.sort_by_cached_key(|r| Reverse(PublishedDate::parse(&r.published_date).ok()));
}

/// Compile a post source into page data
pub fn build_post_page(
    source: &RawSource,
    compiler: &dyn MarkupCompiler,
    blog_dir: &str,
) -> Result<PostPage> {
    let record = summarize(source, blog_dir);
    let rendered = compiler
        .compile(&source.body)
        .with_context(|| format!("Failed to compile {:?}", source.path))?;

    let description = match source.front_matter.extra_str("description") {
        Some(description) => description.to_string(),
        None => excerpt(&rendered.html, DESCRIPTION_CHARS),
    };

    Ok(PostPage {
        slug: source.slug.clone(),
        display_date: format_display_date(&record.published_date),
        title: record.title,
        published_date: record.published_date,
        url: record.url,
        readtime: record.readtime,
        description,
        content: rendered.html,
        extra: source.front_matter.extra.clone(),
    })
}

/// Compile a standalone page source
pub fn build_page(source: &RawSource, compiler: &dyn MarkupCompiler) -> Result<Page> {
    let rendered = compiler
        .compile(&source.body)
        .with_context(|| format!("Failed to compile {:?}", source.path))?;

    Ok(Page {
        slug: source.slug.clone(),
        title: source.title_or_slug(),
        url: format!("/{}", source.slug),
        content: rendered.html,
        extra: source.front_matter.extra.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FrontMatter, RenderedMarkup};
    use std::path::PathBuf;

    fn source(slug: &str, title: Option<&str>, date: Option<&str>, body: &str) -> RawSource {
        RawSource {
            slug: slug.to_string(),
            path: PathBuf::from(format!("posts/{}.mdx", slug)),
            front_matter: FrontMatter {
                title: title.map(str::to_string),
                published_date: date.map(str::to_string),
                ..Default::default()
            },
            body: body.to_string(),
        }
    }

    /// Echoes the body so tests don't depend on real compilation
    struct EchoCompiler;

    impl MarkupCompiler for EchoCompiler {
        fn compile(&self, markup: &str) -> Result<RenderedMarkup> {
            Ok(RenderedMarkup {
                html: format!("<echo>{}</echo>", markup),
                headings: Vec::new(),
            })
        }
    }

    struct FailingCompiler;

    impl MarkupCompiler for FailingCompiler {
        fn compile(&self, _markup: &str) -> Result<RenderedMarkup> {
            anyhow::bail!("boom")
        }
    }

    #[test]
    fn test_homepage_is_sorted_newest_first() {
        let sources = vec![
            source("a", Some("A"), Some("01-01-2020"), ""),
            source("b", Some("B"), Some("15-06-2021"), ""),
            source("c", Some("C"), Some("04-07-2020"), ""),
        ];

        let list = build_homepage_list(&sources, "blog");
        let dates: Vec<_> = list.iter().map(|r| r.published_date.as_str()).collect();
        assert_eq!(dates, vec!["15-06-2021", "04-07-2020", "01-01-2020"]);
    }

    #[test]
    fn test_record_fields() {
        let sources = vec![source("hello-world", Some("Hello"), Some("05-03-2021"), "a b c")];
        let list = build_homepage_list(&sources, "blog");
        assert_eq!(
            list[0],
            PostRecord {
                title: "Hello".to_string(),
                published_date: "05-03-2021".to_string(),
                url: "/blog/hello-world".to_string(),
                readtime: "Less than 1 minute read".to_string(),
            }
        );
    }

    #[test]
    fn test_equal_dates_keep_source_order() {
        let sources = vec![
            source("first", Some("1"), Some("01-01-2021"), ""),
            source("second", Some("2"), Some("01-01-2021"), ""),
            source("newer", Some("3"), Some("02-01-2021"), ""),
        ];
        let list = build_homepage_list(&sources, "blog");
        let titles: Vec<_> = list.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_malformed_dates_sort_last() {
        let sources = vec![
            source("bad", Some("Bad"), Some("June 2021"), ""),
            source("none", None, None, ""),
            source("good", Some("Good"), Some("01-01-1999"), ""),
        ];
        let list = build_homepage_list(&sources, "blog");
        assert_eq!(list[0].title, "Good");
        assert_eq!(list[1].published_date, "June 2021");
        assert_eq!(list[2].title, "");
        assert_eq!(list[2].published_date, "");
    }

    #[test]
    fn test_readtime_uses_body() {
        let body = vec!["word"; 400].join(" ");
        let record = summarize(&source("long", Some("L"), Some("01-01-2021"), &body), "blog");
        assert_eq!(record.readtime, "2 minute read");
    }

    #[test]
    fn test_record_serializes_camel_case_date() {
        let record = summarize(&source("x", Some("X"), Some("01-01-2021"), ""), "blog");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["publishedDate"], "01-01-2021");
        assert_eq!(json["url"], "/blog/x");
    }

    #[test]
    fn test_build_post_page() {
        let mut src = source("post", Some("Post"), Some("15-06-2021"), "Body");
        src.front_matter
            .extra
            .insert("tags".to_string(), serde_yaml::Value::from("rust"));

        let page = build_post_page(&src, &EchoCompiler, "blog").unwrap();
        assert_eq!(page.content, "<echo>Body</echo>");
        assert_eq!(page.display_date, "15 June 2021");
        assert_eq!(page.readtime, "Less than 1 minute read");
        assert_eq!(page.url, "/blog/post");
        assert!(page.extra.contains_key("tags"));
        assert_eq!(page.description, "Body");
    }

    #[test]
    fn test_post_description_from_front_matter() {
        let mut src = source("post", Some("Post"), Some("15-06-2021"), "Body");
        src.front_matter
            .extra
            .insert("description".to_string(), serde_yaml::Value::from("Summary"));

        let page = build_post_page(&src, &EchoCompiler, "blog").unwrap();
        assert_eq!(page.description, "Summary");
    }

    #[test]
    fn test_compile_failure_propagates() {
        let src = source("post", Some("Post"), Some("15-06-2021"), "Body");
        assert!(build_post_page(&src, &FailingCompiler, "blog").is_err());
    }

    #[test]
    fn test_build_page_falls_back_to_slug() {
        let page = build_page(&source("about", None, None, "Hi"), &EchoCompiler).unwrap();
        assert_eq!(page.title, "about");
        assert_eq!(page.url, "/about");
    }
}
