//! Content module - loads post sources and turns them into page data

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod summary;

pub use error::ContentError;
pub use frontmatter::{FrontMatter, FrontMatterParser, YamlFrontMatter};
pub use loader::ContentLoader;
pub use markdown::{toc, Heading, MarkdownRenderer, MarkupCompiler, RenderedMarkup, TOC_MARKER};
pub use post::{Page, PostPage, PostRecord, RawSource};
pub use summary::{build_homepage_list, build_page, build_post_page};
