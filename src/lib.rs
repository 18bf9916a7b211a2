//! folio: a small static site generator for a personal blog and portfolio
//!
//! Posts are markup files with front-matter in a flat directory. A build
//! lists them, summarizes each one into a homepage record (display date,
//! reading time, URL), renders one page per post plus the standalone pages,
//! and writes everything to the public directory.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Config file name, looked up in the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// An opened site: configuration plus resolved directories
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Post sources
    pub posts_dir: PathBuf,
    /// Standalone page sources
    pub pages_dir: PathBuf,
    /// Files copied verbatim into the output
    pub static_dir: PathBuf,
    /// Output directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            posts_dir: base_dir.join(&config.posts_dir),
            pages_dir: base_dir.join(&config.pages_dir),
            static_dir: base_dir.join(&config.static_dir),
            public_dir: base_dir.join(&config.public_dir),
            config,
            base_dir,
        }
    }

    /// Loader over the posts directory
    pub fn post_loader(&self) -> content::ContentLoader {
        content::ContentLoader::new(&self.posts_dir)
    }

    /// Homepage records, newest first
    pub fn homepage_posts(&self) -> Result<Vec<content::PostRecord>> {
        let sources = self.post_loader().load_sources()?;
        Ok(content::build_homepage_list(&sources, &self.config.blog_dir))
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Remove the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
