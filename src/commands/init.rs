//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::helpers::PublishedDate;
use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
title: My Blog
title_template: '%s | My Blog'
description: Personal Blog on Programming
author: John Doe
url: http://example.com
language: en
locale: en_US
favicon: /favicon.png

# Directory
posts_dir: posts
pages_dir: pages
static_dir: static
public_dir: public
blog_dir: blog

# Header
nav:
  - title: Projects
    url: /projects
  - title: About
    url: /about
social: []

# SEO
twitter:
  handle: ''
  site: ''
  card_type: summary

# Code blocks
highlight:
  enable: true
  theme: base16-ocean.dark

# Utterances comments on posts
# comments:
#   repo: user/blog-comments
#   issue_term: url
#   label: comment
#   theme: github-light
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("Site already exists: {:?}", config_path);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("posts"))?;
    fs::create_dir_all(target_dir.join("pages"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let today = PublishedDate::from(chrono::Local::now().date_naive());
    let hello_world = format!(
        r#"---
title: Hello World
publishedDate: {}
description: The first post on this blog
---

Welcome! This is your very first post. Edit or delete it, then start writing.

<TableOfContents />

## Quick Start

### Create a new post

``` bash
$ folio new "My New Post"
```

### Run server

``` bash
$ folio server
```

### Generate static files

``` bash
$ folio generate
```
"#,
        today.to_front_matter()
    );
    fs::write(target_dir.join("posts/hello-world.mdx"), hello_world)?;

    fs::write(
        target_dir.join("pages/about.md"),
        "---\ntitle: About\n---\n\nA few words about the author.\n",
    )?;
    fs::write(
        target_dir.join("pages/projects.md"),
        "---\ntitle: Projects\n---\n\nThings I have built.\n",
    )?;

    Ok(())
}
