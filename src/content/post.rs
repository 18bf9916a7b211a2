//! Post and page models

use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

use super::FrontMatter;

/// A markup file split into metadata and body
#[derive(Debug, Clone)]
pub struct RawSource {
    /// File name without extension
    pub slug: String,

    /// Where the source was read from
    pub path: PathBuf,

    pub front_matter: FrontMatter,

    /// Markup after the front-matter block
    pub body: String,
}

impl RawSource {
    /// Title from front-matter, or the slug when missing
    pub fn title_or_slug(&self) -> String {
        self.front_matter
            .title
            .clone()
            .unwrap_or_else(|| self.slug.clone())
    }
}

/// One entry of the homepage list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub title: String,

    /// `DD-MM-YYYY`, copied from front-matter
    #[serde(rename = "publishedDate")]
    pub published_date: String,

    pub url: String,

    pub readtime: String,
}

/// Everything needed to render a single post page
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub slug: String,
    pub title: String,
    #[serde(rename = "publishedDate")]
    pub published_date: String,
    pub display_date: String,
    pub url: String,
    pub readtime: String,

    /// Front-matter `description`, or an excerpt of the body
    pub description: String,

    /// Compiled body
    pub content: String,

    /// Front-matter keys other than title and date
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// A standalone page (about, projects, ...)
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub content: String,
    pub extra: IndexMap<String, serde_yaml::Value>,
}
