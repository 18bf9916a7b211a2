//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
///
/// Loaded once when the [`crate::Site`] is opened and only ever borrowed
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    /// Page title pattern, `%s` is replaced by the page title
    pub title_template: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub language: String,
    pub locale: String,
    pub favicon: String,

    // Directory
    pub posts_dir: String,
    pub pages_dir: String,
    pub static_dir: String,
    pub public_dir: String,
    /// URL prefix of post pages
    pub blog_dir: String,

    // Header
    #[serde(default)]
    pub nav: Vec<NavLink>,
    #[serde(default)]
    pub social: Vec<SocialLink>,

    // SEO
    #[serde(default)]
    pub twitter: TwitterConfig,

    // Posts
    pub comments: Option<CommentsConfig>,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            title_template: "%s | My Blog".to_string(),
            description: "Personal Blog on Programming".to_string(),
            author: "John Doe".to_string(),
            url: "http://example.com".to_string(),
            language: "en".to_string(),
            locale: "en_US".to_string(),
            favicon: "/favicon.png".to_string(),

            posts_dir: "posts".to_string(),
            pages_dir: "pages".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),

            nav: vec![
                NavLink::new("Projects", "/projects"),
                NavLink::new("About", "/about"),
            ],
            social: Vec::new(),

            twitter: TwitterConfig::default(),

            comments: None,
            highlight: HighlightConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Apply the title template to a page title
    pub fn page_title(&self, title: &str) -> String {
        if title.is_empty() {
            self.title.clone()
        } else {
            self.title_template.replace("%s", title)
        }
    }
}

/// An entry of the header navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLink {
    pub title: String,
    pub url: String,
}

impl NavLink {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
        }
    }
}

/// A social profile shown in the header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub url: String,
}

/// Twitter card metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterConfig {
    pub handle: String,
    pub site: String,
    pub card_type: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            handle: String::new(),
            site: String::new(),
            card_type: "summary".to_string(),
        }
    }
}

/// Utterances comment widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub repo: String,
    pub issue_term: String,
    pub label: String,
    pub theme: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            issue_term: "url".to_string(),
            label: "comment".to_string(),
            theme: "github-light".to_string(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}
