//! Content loader - loads posts and pages from the content directory

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentRecord, FrontMatter, PageRecord, Taxon};
use crate::config::SiteConfig;
use crate::error::ContentError;
use crate::Polypress;

/// Loads authored content from the content directory
pub struct ContentLoader<'a> {
    site: &'a Polypress,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Polypress) -> Self {
        Self { site }
    }

    fn posts_root(&self) -> PathBuf {
        self.site.content_dir.join(&self.site.config.posts_dir)
    }

    fn pages_root(&self) -> PathBuf {
        self.site.content_dir.join(&self.site.config.pages_dir)
    }

    /// Load every post in every locale, in file-name order
    pub fn load_posts(&self) -> Result<Vec<ContentRecord>> {
        let root = self.posts_root();
        let mut posts = Vec::new();

        for path in content_files(&root) {
            match self.load_post(&root, &path) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping post: {}", e),
            }
        }

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), root);
        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, root: &Path, path: &Path) -> Result<ContentRecord, ContentError> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content).map_err(|e| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (locale, slugs) = locate(root, path, &self.site.config);
        // The posts listing owns `/posts`
        if slugs.is_empty() {
            return Err(ContentError::EmptyIdentifier {
                path: path.to_path_buf(),
            });
        }

        let title = fm.title.ok_or_else(|| ContentError::MissingField {
            path: path.to_path_buf(),
            field: "title",
        })?;
        let raw_date = fm.date.clone().ok_or_else(|| ContentError::MissingField {
            path: path.to_path_buf(),
            field: "date",
        })?;
        let published_at =
            super::parse_date_string(&raw_date).ok_or_else(|| ContentError::InvalidDate {
                path: path.to_path_buf(),
                value: raw_date.clone(),
            })?;
        let category = fm.category.ok_or_else(|| ContentError::MissingField {
            path: path.to_path_buf(),
            field: "category",
        })?;

        Ok(ContentRecord {
            identifier: slugs.join("/"),
            slugs,
            authored_locale: locale.clone(),
            locale,
            title,
            description: fm.description,
            published_at,
            author: fm.author,
            category,
            tags: dedup_tags(fm.tags, path),
            cover: fm.cover,
            body: body.to_string(),
            source_path: path.to_path_buf(),
        })
    }

    /// Load every standalone page in every locale
    pub fn load_pages(&self) -> Result<Vec<PageRecord>> {
        let root = self.pages_root();
        let mut pages = Vec::new();

        for path in content_files(&root) {
            match self.load_page(&root, &path) {
                Ok(page) => pages.push(page),
                Err(e) => tracing::warn!("Skipping page: {}", e),
            }
        }

        tracing::debug!("Loaded {} pages from {:?}", pages.len(), root);
        Ok(pages)
    }

    /// Load a single page from a file
    fn load_page(&self, root: &Path, path: &Path) -> Result<PageRecord, ContentError> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content).map_err(|e| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (locale, slugs) = locate(root, path, &self.site.config);

        // Get title from front-matter or filename
        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        Ok(PageRecord {
            identifier: slugs.join("/"),
            slugs,
            authored_locale: locale.clone(),
            locale,
            title,
            description: fm.description,
            body: body.to_string(),
            source_path: path.to_path_buf(),
        })
    }
}

/// Markdown and MDX files under `root`, sorted so loads are reproducible
fn content_files(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_content_file(p))
        .collect()
}

/// Check if a file is a markdown or MDX file
fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "mdx" | "markdown"))
        .unwrap_or(false)
}

/// Split a content path into its locale and slug segments.
///
/// A leading directory named after a configured locale selects that locale;
/// anything else belongs to the default locale. A trailing `index` segment
/// names its parent directory.
fn locate(root: &Path, path: &Path, config: &SiteConfig) -> (String, Vec<String>) {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(str::to_string)
        .collect();

    let in_locale_dir = segments.len() > 1 && config.has_locale(&segments[0]);
    let locale = if in_locale_dir {
        segments.remove(0)
    } else {
        config.default_locale.clone()
    };

    if segments.last().map(String::as_str) == Some("index") {
        segments.pop();
    }

    (locale, segments)
}

/// Keep the first occurrence of each tag id
fn dedup_tags(tags: Vec<Taxon>, path: &Path) -> Vec<Taxon> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| {
            let fresh = seen.insert(tag.id.clone());
            if !fresh {
                tracing::warn!("{:?}: duplicate tag id `{}` ignored", path, tag.id);
            }
            fresh
        })
        .collect()
}
