//! URL helper functions

use crate::config::SiteConfig;

/// Public URL of a post
///
/// # Examples
/// ```
/// assert_eq!(folio::helpers::post_url("blog", "hello-world"), "/blog/hello-world");
/// ```
pub fn post_url(blog_dir: &str, slug: &str) -> String {
    let prefix = blog_dir.trim_matches('/');
    if prefix.is_empty() {
        format!("/{}", slug)
    } else {
        format!("/{}/{}", prefix, slug)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about") // -> "https://example.com/about"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Whether a link points outside the site
pub fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}
