//! Site configuration (_config.yml)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::Author;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub name: String,
    pub logo: String,
    pub tagline: String,
    pub description: String,
    pub keywords: Vec<String>,

    /// Author used for records whose front-matter has none
    pub author: Author,

    // URL
    pub url: String,

    // Locales
    pub locales: Vec<String>,
    pub default_locale: String,
    pub hide_default_locale: bool,

    // Directory
    pub content_dir: String,
    pub posts_dir: String,
    pub pages_dir: String,
    pub messages_dir: String,
    pub public_dir: String,

    // Listing
    pub per_page: usize,
    pub feed_limit: usize,

    #[serde(default)]
    pub robots: RobotsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Polypress".to_string(),
            logo: "/avatar.png".to_string(),
            tagline: String::new(),
            description: String::new(),
            keywords: Vec::new(),

            author: Author {
                name: "John Doe".to_string(),
                url: None,
                avatar: None,
            },

            url: "http://localhost:3000".to_string(),

            locales: vec!["en".to_string()],
            default_locale: "en".to_string(),
            hide_default_locale: true,

            content_dir: "content".to_string(),
            posts_dir: "posts".to_string(),
            pages_dir: "pages".to_string(),
            messages_dir: "messages".to_string(),
            public_dir: "public".to_string(),

            per_page: 12,
            feed_limit: 20,

            robots: RobotsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the locale settings are coherent
    pub fn validate(&self) -> Result<()> {
        if self.locales.is_empty() {
            bail!("`locales` must list at least one locale");
        }
        if !self.locales.contains(&self.default_locale) {
            bail!(
                "default locale `{}` is not one of the configured locales {:?}",
                self.default_locale,
                self.locales
            );
        }
        if self.per_page == 0 {
            bail!("`per_page` must be at least 1");
        }
        Ok(())
    }

    /// Whether `locale` is one of the configured locales
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }
}

/// robots.txt rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub user_agent: String,
    pub allow: String,
    pub disallow: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            user_agent: "*".to_string(),
            allow: "/".to_string(),
            disallow: vec![
                "/api/".to_string(),
                "/_next/".to_string(),
                "/feed.xml".to_string(),
                "/admin/".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.per_page, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
name: My Blog
url: https://blog.example.com
locales: [en, zh]
default_locale: en
author:
  name: Test User
  url: https://example.com
per_page: 20
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "My Blog");
        assert_eq!(config.author.name, "Test User");
        assert_eq!(config.author.url.as_deref(), Some("https://example.com"));
        assert_eq!(config.locales, vec!["en", "zh"]);
        assert_eq!(config.per_page, 20);
        assert!(config.has_locale("zh"));
        assert!(!config.has_locale("fr"));
    }

    #[test]
    fn test_default_locale_must_be_listed() {
        let yaml = r#"
locales: [zh, ja]
default_locale: en
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
