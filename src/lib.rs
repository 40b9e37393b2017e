//! polypress: a multilingual blog content engine
//!
//! Loads MDX/Markdown posts and pages per locale, aggregates them into
//! recency-ordered, paginated listings and category/tag summaries, and
//! emits the data tree (listings, SEO metadata, sitemap, feed) a site
//! renderer consumes.

pub mod aggregate;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod i18n;
pub mod routes;
pub mod seo;
pub mod store;

use anyhow::Result;
use std::path::Path;

/// The main Polypress application
#[derive(Clone)]
pub struct Polypress {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory (posts and pages live below it)
    pub content_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// UI message catalogs
    pub messages_dir: std::path::PathBuf,
}

impl Polypress {
    /// Create a new Polypress instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let messages_dir = base_dir.join(&config.messages_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            messages_dir,
        })
    }

    /// Generate the data tree
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, locale: Option<&str>) -> Result<()> {
        let options = commands::new::NewOptions {
            locale: locale.map(str::to_string),
            ..Default::default()
        };
        commands::new::create(self, title, &options).map(|_| ())
    }
}
