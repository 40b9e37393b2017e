//! SEO metadata for rendered pages: canonical URLs, hreflang alternates,
//! OpenGraph and Twitter cards, and robots rules

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{Author, ContentRecord};
use crate::i18n::{og_locale, LocaleRouting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OgType {
    #[default]
    Website,
    Article,
}

/// What a page knows about itself
#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    pub title: String,
    pub description: Option<String>,
    pub kind: OgType,
    pub published_time: Option<DateTime<Utc>>,
    pub authors: Vec<Author>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
}

impl MetadataOptions {
    pub fn website(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            ..Default::default()
        }
    }

    /// Article metadata for a post; relative cover paths become absolute
    pub fn article(post: &ContentRecord, routing: &LocaleRouting) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone(),
            kind: OgType::Article,
            published_time: Some(post.published_at),
            authors: post.author.iter().cloned().collect(),
            images: post
                .cover
                .iter()
                .map(|cover| absolute(routing, cover))
                .collect(),
            tags: post.tags.iter().map(|t| t.title.clone()).collect(),
            category: Some(post.category.title.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub site_name: String,
    pub locale: String,
    #[serde(rename = "type")]
    pub kind: OgType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Author>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// Everything a page head needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub application_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub authors: Vec<Author>,
    pub keywords: Vec<String>,
    pub canonical: String,
    pub alternates: IndexMap<String, String>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
}

/// Metadata for the page at `path` in `locale`
pub fn generate_metadata(
    config: &SiteConfig,
    routing: &LocaleRouting,
    locale: &str,
    path: &str,
    options: MetadataOptions,
) -> PageMetadata {
    let canonical = routing.url(path, Some(locale));
    let authors = if options.authors.is_empty() {
        vec![config.author.clone()]
    } else {
        options.authors
    };
    let keywords = if options.tags.is_empty() {
        config.keywords.clone()
    } else {
        options.tags.clone()
    };
    let is_article = options.kind == OgType::Article;

    let open_graph = OpenGraph {
        title: options.title.clone(),
        description: options.description.clone(),
        site_name: config.name.clone(),
        locale: og_locale(Some(locale), routing.default_locale()),
        kind: options.kind,
        published_time: options
            .published_time
            .filter(|_| is_article)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        authors: if is_article { authors.clone() } else { Vec::new() },
        images: if is_article { options.images.clone() } else { Vec::new() },
        tags: if is_article { options.tags } else { Vec::new() },
        url: is_article.then(|| canonical.clone()),
    };

    let twitter = TwitterCard {
        card: if options.images.is_empty() {
            "summary"
        } else {
            "summary_large_image"
        },
        title: options.title.clone(),
        description: options.description.clone(),
        images: options.images,
    };

    PageMetadata {
        title: options.title,
        description: options.description,
        application_name: config.name.clone(),
        category: options.category,
        authors,
        keywords,
        alternates: routing.alternates(path),
        canonical,
        open_graph,
        twitter,
    }
}

/// robots.txt content as data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Robots {
    pub rules: Vec<RobotsRule>,
    pub sitemap: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotsRule {
    pub user_agent: String,
    pub allow: String,
    pub disallow: Vec<String>,
}

pub fn robots(config: &SiteConfig, routing: &LocaleRouting) -> Robots {
    Robots {
        rules: vec![RobotsRule {
            user_agent: config.robots.user_agent.clone(),
            allow: config.robots.allow.clone(),
            disallow: config.robots.disallow.clone(),
        }],
        sitemap: routing.url("/sitemap.xml", None),
    }
}

/// Absolute form of a site-relative asset path; absolute URLs pass through
pub fn absolute(routing: &LocaleRouting, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        routing.url(path, None)
    }
}
