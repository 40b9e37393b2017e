//! Create a new post or page

use anyhow::{bail, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::content::Taxon;
use crate::error::ContentError;
use crate::Polypress;

const DEFAULT_CATEGORY: &str = "General";

/// Options for `polypress new`
#[derive(Debug, Clone, Default)]
pub struct NewOptions {
    /// Locale to author in; the default locale when absent
    pub locale: Option<String>,
    /// Category title for posts
    pub category: Option<String>,
    /// `post` or `page`
    pub layout: Option<String>,
}

/// Front-matter written into a fresh file
#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Taxon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<Taxon>>,
}

/// Create a new post or page, returning the path written
pub fn create(site: &Polypress, title: &str, options: &NewOptions) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        bail!("Cannot derive a file name from title {:?}", title);
    }

    let layout = options.layout.as_deref().unwrap_or("post");
    let section = match layout {
        "post" => &site.config.posts_dir,
        "page" => &site.config.pages_dir,
        other => bail!("Unknown layout: {}. Available: post, page", other),
    };

    // Default-locale content lives at the top of the section
    let mut target_dir = site.content_dir.join(section);
    if let Some(locale) = options.locale.as_deref() {
        if !site.config.has_locale(locale) {
            return Err(ContentError::UnknownLocale(locale.to_string()).into());
        }
        if locale != site.config.default_locale {
            target_dir = target_dir.join(locale);
        }
    }

    let file_path = target_dir.join(format!("{}.mdx", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let scaffold = if layout == "post" {
        let category = options.category.as_deref().unwrap_or(DEFAULT_CATEGORY);
        Scaffold {
            title,
            date: Some(chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()),
            category: Some(Taxon::new(slug::slugify(category), category)),
            tags: Some(Vec::new()),
        }
    } else {
        Scaffold {
            title,
            date: None,
            category: None,
            tags: None,
        }
    };
    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&scaffold)?);

    fs::create_dir_all(&target_dir)?;
    fs::write(&file_path, content)?;
    tracing::debug!("Created {} {:?}", layout, file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use tempfile::TempDir;

    fn site() -> (TempDir, Polypress) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "locales: [en, zh]\ndefault_locale: en\n",
        )
        .unwrap();
        let site = Polypress::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_new_post_round_trips_through_loader() {
        let (_dir, site) = site();
        let options = NewOptions {
            category: Some("Systems Programming".to_string()),
            ..Default::default()
        };
        let path = create(&site, "Hello: \"World\"", &options).unwrap();
        assert!(path.ends_with("content/posts/hello-world.mdx"));

        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Hello: \"World\"");
        assert_eq!(posts[0].locale, "en");
        assert_eq!(posts[0].category.id, "systems-programming");
        assert_eq!(posts[0].category.title, "Systems Programming");
        assert!(posts[0].tags.is_empty());
    }

    #[test]
    fn test_new_post_in_other_locale() {
        let (_dir, site) = site();
        let options = NewOptions {
            locale: Some("zh".to_string()),
            ..Default::default()
        };
        let path = create(&site, "Hello", &options).unwrap();
        assert!(path.ends_with("content/posts/zh/hello.mdx"));

        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(posts[0].locale, "zh");
        assert_eq!(posts[0].identifier, "hello");
    }

    #[test]
    fn test_new_page() {
        let (_dir, site) = site();
        let options = NewOptions {
            layout: Some("page".to_string()),
            ..Default::default()
        };
        create(&site, "About Me", &options).unwrap();

        let pages = ContentLoader::new(&site).load_pages().unwrap();
        assert_eq!(pages[0].identifier, "about-me");
        assert_eq!(pages[0].title, "About Me");
    }

    #[test]
    fn test_new_rejects_bad_input() {
        let (_dir, site) = site();
        create(&site, "Hello", &NewOptions::default()).unwrap();
        assert!(create(&site, "Hello", &NewOptions::default()).is_err());

        let unknown_locale = NewOptions {
            locale: Some("fr".to_string()),
            ..Default::default()
        };
        assert!(create(&site, "Bonjour", &unknown_locale).is_err());

        let unknown_layout = NewOptions {
            layout: Some("draft".to_string()),
            ..Default::default()
        };
        assert!(create(&site, "Draft", &unknown_layout).is_err());
        assert!(create(&site, "???", &NewOptions::default()).is_err());
    }
}
