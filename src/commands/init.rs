//! Initialize a new Polypress site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Polypress Configuration

# Site
name: Polypress
logo: /avatar.png
tagline: ''
description: ''
keywords: []
author:
  name: John Doe

# URL
url: http://localhost:3000

# Locales
locales: [en]
default_locale: en
hide_default_locale: true

# Directory
content_dir: content
posts_dir: posts
pages_dir: pages
messages_dir: messages
public_dir: public

# Listing
per_page: 12
feed_limit: 20
"#;

const MESSAGES: &str = r#"blog:
  allPosts: All Posts
  postsCount: "{count} posts"
categories:
  title: Categories
tags:
  title: Tags
post:
  categoryPrefix: Category
  tagPrefix: Tag
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        bail!("A site already exists in {:?}", target_dir);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("content/pages"))?;
    fs::create_dir_all(target_dir.join("messages"))?;

    fs::write(&config_path, CONFIG)?;
    fs::write(target_dir.join("messages/en.yml"), MESSAGES)?;

    // Create a sample post
    let now = chrono::Utc::now();
    let sample_post = format!(
        r#"---
title: Hello World
description: Your very first post
date: {}
category:
  id: general
  title: General
tags:
  - id: welcome
    title: Welcome
---

Welcome to Polypress! Write posts under `content/posts`, one directory per
extra locale (`content/posts/zh/hello-world.mdx`), then run

```bash
$ polypress generate
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );
    fs::write(target_dir.join("content/posts/hello-world.mdx"), sample_post)?;

    let about = r#"---
title: About
description: About this site
---

Tell your readers who you are.
"#;
    fs::write(target_dir.join("content/pages/about.mdx"), about)?;

    tracing::debug!("Scaffolded site in {:?}", target_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use crate::Polypress;
    use tempfile::TempDir;

    #[test]
    fn test_init_site_is_loadable() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = Polypress::new(dir.path()).unwrap();
        assert_eq!(site.config.locales, vec!["en"]);

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].identifier, "hello-world");
        assert_eq!(posts[0].category.id, "general");
        assert_eq!(loader.load_pages().unwrap()[0].identifier, "about");
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
