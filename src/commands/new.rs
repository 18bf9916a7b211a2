//! Create a new post

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::helpers::PublishedDate;
use crate::Site;

/// Front-matter of a freshly created post
#[derive(Serialize)]
struct NewPostFrontMatter<'a> {
    title: &'a str,
    #[serde(rename = "publishedDate")]
    published_date: String,
}

/// Create `posts/{slug}.mdx` dated today
///
/// The slug defaults to the slugified title. Existing files are never
/// overwritten.
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&site.posts_dir)?;

    if let Some(existing) = ["mdx", "md"]
        .iter()
        .map(|ext| site.posts_dir.join(format!("{}.{}", slug, ext)))
        .find(|p| p.exists())
    {
        anyhow::bail!("File already exists: {:?}", existing);
    }

    let front_matter = NewPostFrontMatter {
        title,
        published_date: PublishedDate::from(chrono::Local::now().date_naive()).to_front_matter(),
    };
    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&front_matter)?);

    let file_path = site.posts_dir.join(format!("{}.mdx", slug));
    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn site(tmp: &TempDir) -> Site {
        Site::with_config(tmp.path(), SiteConfig::default())
    }

    #[test]
    fn test_create_post() {
        let tmp = TempDir::new().unwrap();
        let site = site(&tmp);

        let path = create_post(&site, "My First Post", None).unwrap();
        assert_eq!(path, site.posts_dir.join("my-first-post.mdx"));

        let posts = site.homepage_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "My First Post");
        assert_eq!(posts[0].url, "/blog/my-first-post");
        assert!(PublishedDate::parse(&posts[0].published_date).is_ok());
    }

    #[test]
    fn test_create_post_with_slug() {
        let tmp = TempDir::new().unwrap();
        let site = site(&tmp);

        let path = create_post(&site, "Rust: A Tour", Some("rust-tour")).unwrap();
        assert_eq!(path, site.posts_dir.join("rust-tour.mdx"));

        let posts = site.homepage_posts().unwrap();
        assert_eq!(posts[0].title, "Rust: A Tour");
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let site = site(&tmp);
        fs::create_dir_all(&site.posts_dir).unwrap();
        fs::write(site.posts_dir.join("hello.md"), "existing").unwrap();

        assert!(create_post(&site, "Hello", None).is_err());
        assert_eq!(
            fs::read_to_string(site.posts_dir.join("hello.md")).unwrap(),
            "existing"
        );
    }

    #[test]
    fn test_titles_that_look_like_yaml_survive() {
        let tmp = TempDir::new().unwrap();
        let site = site(&tmp);

        let titles = ["Why Rust:", "null", "true", "- list", "#hash", "'quoted'"];
        for (i, title) in titles.iter().enumerate() {
            create_post(&site, title, Some(&format!("post-{}", i))).unwrap();
        }

        let loader = site.post_loader();
        for (i, title) in titles.iter().enumerate() {
            let source = loader.load_source(&format!("post-{}", i)).unwrap();
            assert_eq!(source.front_matter.title.as_deref(), Some(*title));
            let date = source.front_matter.published_date.unwrap();
            assert!(PublishedDate::parse(&date).is_ok());
            assert!(source.body.is_empty());
        }
    }
}
