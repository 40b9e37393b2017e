//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::{Author, Taxon};

/// A category or tag as written in front-matter: either `{id, title}` or a bare title
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TaxonRepr {
    Full { id: String, title: String },
    Title(String),
}

impl From<TaxonRepr> for Taxon {
    fn from(repr: TaxonRepr) -> Self {
        match repr {
            TaxonRepr::Full { id, title } => Taxon { id, title },
            TaxonRepr::Title(title) => Taxon {
                id: slug::slugify(&title),
                title,
            },
        }
    }
}

fn taxon_opt<'de, D>(deserializer: D) -> Result<Option<Taxon>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TaxonRepr>::deserialize(deserializer)?.map(Taxon::from))
}

/// Handles a single taxon, a list of them, or nothing
fn taxon_or_vec<'de, D>(deserializer: D) -> Result<Vec<Taxon>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<TaxonRepr>),
        One(TaxonRepr),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items.into_iter().map(Taxon::from).collect(),
        Some(OneOrMany::One(item)) => vec![item.into()],
        None => Vec::new(),
    })
}

/// Front-matter data from a post or page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub author: Option<Author>,
    #[serde(deserialize_with = "taxon_opt")]
    pub category: Option<Taxon>,
    #[serde(deserialize_with = "taxon_or_vec")]
    pub tags: Vec<Taxon>,
    pub cover: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let trimmed = content.trim_start();

        let Some(rest) = trimmed.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content));
        };
        let rest = rest.trim_start_matches(['\n', '\r']);

        // An unterminated fence is plain content
        let Some(end_pos) = find_closing_fence(rest) else {
            return Ok((FrontMatter::default(), content));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos..]
            .trim_start_matches('\n')
            .trim_start_matches("---")
            .trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
        Ok((fm, remaining))
    }

    /// Parse the date string into a UTC timestamp
    pub fn parse_date(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Byte offset of the `\n---` line closing the front-matter block
fn find_closing_fence(rest: &str) -> Option<usize> {
    if rest.starts_with("---") {
        return Some(0);
    }
    rest.find("\n---")
}

/// Parse a date string in various formats; naive values are taken as UTC
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
category:
  id: rust
  title: Rust
tags:
  - id: async
    title: Async
  - id: tokio
    title: Tokio
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.category, Some(Taxon::new("rust", "Rust")));
        assert_eq!(
            fm.tags,
            vec![Taxon::new("async", "Async"), Taxon::new("tokio", "Tokio")]
        );
        assert!(remaining.starts_with("This is the content."));
    }

    #[test]
    fn test_bare_titles_are_slugified() {
        let content = r#"---
title: Notes
category: Web Development
tags: Side Projects
---
Body
"#;

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(
            fm.category,
            Some(Taxon::new("web-development", "Web Development"))
        );
        assert_eq!(fm.tags, vec![Taxon::new("side-projects", "Side Projects")]);
    }

    #[test]
    fn test_author_and_extras() {
        let content = r#"---
title: Post
author:
  name: Jane
  avatar: /jane.png
draft: true
---
"#;

        let (fm, _) = FrontMatter::parse(content).unwrap();
        let author = fm.author.unwrap();
        assert_eq!(author.name, "Jane");
        assert_eq!(author.avatar.as_deref(), Some("/jane.png"));
        assert_eq!(author.url, None);
        assert_eq!(fm.extra.get("draft"), Some(&serde_yaml::Value::Bool(true)));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\nText.";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert!(fm.title.is_none());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_unterminated_fence_is_content() {
        let content = "---\ntitle: Dangling\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert!(fm.title.is_none());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        assert!(FrontMatter::parse(content).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let day = parse_date_string("2024-01-15").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-01-15T00:00:00+00:00");

        let with_time = parse_date_string("2024/01/15 10:30:00").unwrap();
        assert_eq!(with_time.format("%H:%M").to_string(), "10:30");

        let offset = parse_date_string("2024-01-15T08:00:00+08:00").unwrap();
        assert_eq!(offset.to_rfc3339(), "2024-01-15T00:00:00+00:00");

        assert!(parse_date_string("yesterday").is_none());
    }
}
