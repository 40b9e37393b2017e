//! Post and page records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A category or tag reference: a stable id plus its display title
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Taxon {
    pub id: String,
    pub title: String,
}

impl Taxon {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Post author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A published post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    /// Slug path, unique within `locale`
    pub identifier: String,

    /// Path segments making up `identifier`
    pub slugs: Vec<String>,

    /// Locale this record is visible in
    pub locale: String,

    /// Locale the file was written in (differs from `locale` for projected records)
    pub authored_locale: String,

    pub title: String,

    pub description: Option<String>,

    /// Publication date
    pub published_at: DateTime<Utc>,

    /// Absent until resolved against the site default
    pub author: Option<Author>,

    /// Exactly one category per post
    pub category: Taxon,

    /// Tags in front-matter order, ids unique within the record
    pub tags: Vec<Taxon>,

    /// Cover image path
    pub cover: Option<String>,

    /// Raw MDX/Markdown body
    pub body: String,

    /// Source file path
    #[serde(skip)]
    pub source_path: PathBuf,
}

impl ContentRecord {
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    /// Title of one of this record's tags
    pub fn tag_title(&self, tag_id: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.id == tag_id)
            .map(|t| t.title.as_str())
    }

    /// Whether this record was copied from another locale
    pub fn is_projected(&self) -> bool {
        self.locale != self.authored_locale
    }

    /// Copy of this record as seen from another locale
    pub fn project_into(&self, locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            ..self.clone()
        }
    }

    /// Site-relative URL path, without locale prefix
    pub fn path(&self) -> String {
        format!("/posts/{}", self.identifier)
    }
}

/// A standalone page (about, links, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub identifier: String,
    pub slugs: Vec<String>,
    pub locale: String,
    pub authored_locale: String,
    pub title: String,
    pub description: Option<String>,
    pub body: String,
    #[serde(skip)]
    pub source_path: PathBuf,
}

impl PageRecord {
    pub fn project_into(&self, locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            ..self.clone()
        }
    }

    pub fn path(&self) -> String {
        if self.identifier.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.identifier)
        }
    }
}

/// Records visible in some locale
pub trait Localized {
    fn identifier(&self) -> &str;
    fn locale(&self) -> &str;
    fn authored_locale(&self) -> &str;
    fn project_into(&self, locale: &str) -> Self;
}

impl Localized for ContentRecord {
    fn identifier(&self) -> &str {
        &self.identifier
    }
    fn locale(&self) -> &str {
        &self.locale
    }
    fn authored_locale(&self) -> &str {
        &self.authored_locale
    }
    fn project_into(&self, locale: &str) -> Self {
        ContentRecord::project_into(self, locale)
    }
}

impl Localized for PageRecord {
    fn identifier(&self) -> &str {
        &self.identifier
    }
    fn locale(&self) -> &str {
        &self.locale
    }
    fn authored_locale(&self) -> &str {
        &self.authored_locale
    }
    fn project_into(&self, locale: &str) -> Self {
        PageRecord::project_into(self, locale)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Build a post dated at midnight UTC on the given day
    pub fn record(id: &str, (y, m, d): (i32, u32, u32), category: &str) -> ContentRecord {
        ContentRecord {
            identifier: id.to_string(),
            slugs: id.split('/').map(str::to_string).collect(),
            locale: "en".to_string(),
            authored_locale: "en".to_string(),
            title: id.to_uppercase(),
            description: None,
            published_at: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
            author: None,
            category: Taxon::new(category.to_lowercase(), category),
            tags: Vec::new(),
            cover: None,
            body: String::new(),
            source_path: PathBuf::from(format!("{}.mdx", id)),
        }
    }

    pub fn tagged(mut record: ContentRecord, tags: &[&str]) -> ContentRecord {
        record.tags = tags
            .iter()
            .map(|t| Taxon::new(t.to_lowercase(), *t))
            .collect();
        record
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_projection_keeps_authored_locale() {
        let post = record("hello", (2024, 1, 3), "Rust");
        let projected = post.project_into("zh");
        assert_eq!(projected.locale, "zh");
        assert_eq!(projected.authored_locale, "en");
        assert!(projected.is_projected());
        assert!(!post.is_projected());
    }

    #[test]
    fn test_tag_lookup() {
        let post = tagged(record("hello", (2024, 1, 3), "Rust"), &["Async", "Tokio"]);
        assert!(post.has_tag("async"));
        assert!(!post.has_tag("Async"));
        assert_eq!(post.tag_title("tokio"), Some("Tokio"));
        assert_eq!(post.path(), "/posts/hello");
    }
}
