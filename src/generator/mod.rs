//! Generator module - emits the JSON data tree a site renderer consumes
//!
//! Layout under `public_dir`:
//!
//! ```text
//! <locale>/posts/page/<n>.json     paginated post summaries
//! <locale>/posts/<id>.json         one post with metadata and prev/next
//! <locale>/categories.json         category summaries
//! <locale>/categories/<id>.json    posts in one category
//! <locale>/tags.json               tag summaries
//! <locale>/tags/<id>.json          posts carrying one tag
//! <locale>/pages/<id>.json         standalone pages
//! <locale>/feed.json               newest posts for the feed serializer
//! sitemap.json robots.json routes.json
//! ```

use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::{resolve_author, Aggregator, PageWindow};
use crate::content::{Author, ContentRecord, Taxon};
use crate::i18n::{LocaleRouting, Messages};
use crate::routes::{encode_segment, page_url, sitemap, static_params, StaticParam};
use crate::seo::{self, absolute, generate_metadata, MetadataOptions, PageMetadata};
use crate::store::ContentStore;
use crate::Polypress;

/// A post as it appears in listings
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub identifier: String,
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
    pub author: Option<Author>,
    pub category: Taxon,
    pub tags: Vec<Taxon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub authored_locale: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub title: String,
    pub url: String,
}

#[derive(Serialize)]
struct PostIndex {
    metadata: PageMetadata,
    window: PageWindow<PostSummary>,
    total_pages: usize,
    prev_url: Option<String>,
    next_url: Option<String>,
}

#[derive(Serialize)]
struct PostEntry<'a> {
    post: &'a ContentRecord,
    url: String,
    metadata: PageMetadata,
    /// Older neighbour
    prev: Option<NavLink>,
    /// Newer neighbour
    next: Option<NavLink>,
}

#[derive(Serialize)]
struct Listing<T> {
    metadata: PageMetadata,
    items: Vec<T>,
}

#[derive(Serialize)]
struct TaxonDetail {
    id: String,
    title: String,
    count: usize,
    metadata: PageMetadata,
    posts: Vec<PostSummary>,
}

#[derive(Serialize)]
struct PageEntry<'a> {
    page: &'a crate::content::PageRecord,
    url: String,
    metadata: PageMetadata,
}

#[derive(Serialize)]
struct RouteEntry<'a> {
    #[serde(flatten)]
    param: &'a StaticParam,
    path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedCategory {
    pub name: String,
    pub term: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub id: String,
    pub link: String,
    pub description: String,
    pub content: String,
    pub author: Vec<FeedAuthor>,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: Vec<FeedCategory>,
    pub tags: Vec<String>,
}

/// Channel data plus items, shaped for an RSS/Atom encoder
#[derive(Debug, Clone, Serialize)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub id: String,
    pub link: String,
    pub language: String,
    pub image: String,
    pub favicon: String,
    pub copyright: String,
    pub updated: DateTime<Utc>,
    pub rss2: String,
    pub author: FeedAuthor,
    pub items: Vec<FeedItem>,
}

/// What a generation run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerateReport {
    pub locales: usize,
    pub posts: usize,
    pub pages: usize,
    pub files: usize,
}

/// Writes the data tree for a loaded [`ContentStore`]
pub struct Generator<'a> {
    site: &'a Polypress,
    store: &'a ContentStore,
    routing: LocaleRouting,
    messages: Messages,
    written: Cell<usize>,
}

impl<'a> Generator<'a> {
    /// Create a new generator, loading UI messages from `messages_dir`
    pub fn new(site: &'a Polypress, store: &'a ContentStore) -> Result<Self> {
        let mut messages = Messages::new(&site.config.default_locale);
        messages.load_dir(&site.messages_dir)?;

        Ok(Self {
            site,
            store,
            routing: LocaleRouting::new(&site.config),
            messages,
            written: Cell::new(0),
        })
    }

    /// Generate the whole tree; `now` stamps the sitemap and feed
    pub fn generate(&self, now: DateTime<Utc>) -> Result<GenerateReport> {
        fs::create_dir_all(&self.site.public_dir)?;
        self.written.set(0);

        let mut report = GenerateReport::default();
        for locale in self.store.locales() {
            self.generate_locale(locale, now)?;
            report.locales += 1;
            report.posts += self.store.posts(locale).len();
            report.pages += self.store.pages(locale).len();
        }

        self.generate_site_files(now)?;
        report.files = self.written.get();
        Ok(report)
    }

    fn generate_locale(&self, locale: &str, now: DateTime<Utc>) -> Result<()> {
        let aggregator = Aggregator::new(locale, &self.site.config.author);
        let posts = aggregator.list_by_recency(self.store.posts(locale));
        let dir = PathBuf::from(locale);

        self.generate_post_index(&aggregator, &posts, &dir)?;
        self.generate_post_entries(locale, &posts, &dir)?;
        self.generate_categories(&aggregator, &posts, &dir)?;
        self.generate_tags(&aggregator, &posts, &dir)?;
        self.generate_pages(locale, &dir)?;
        self.generate_feed(locale, &posts, now, &dir)?;

        tracing::info!("Generated locale {} ({} posts)", locale, posts.len());
        Ok(())
    }

    /// Paginated post listings; page 1 is written even when empty
    fn generate_post_index(
        &self,
        aggregator: &Aggregator,
        posts: &[ContentRecord],
        dir: &Path,
    ) -> Result<()> {
        let locale = aggregator.locale();
        let size = self.site.config.per_page;
        let total_pages = posts.len().div_ceil(size).max(1);
        let title = self.messages.get_or(locale, "blog.allPosts", "All Posts");

        for page in 1..=total_pages {
            let window = aggregator
                .paginate(posts, page, size)
                .map(|post| self.summary(&post, locale));
            let path = page_url("/posts", page);
            let link = |p: usize| {
                self.routing
                    .localized_path(&page_url("/posts", p), Some(locale))
            };

            let index = PostIndex {
                metadata: self.metadata(
                    locale,
                    &path,
                    MetadataOptions::website(title.clone(), self.site_description()),
                ),
                prev_url: window.prev_page().map(link),
                next_url: window.next_page().map(link),
                total_pages,
                window,
            };
            let file = dir.join("posts").join("page").join(format!("{}.json", page));
            self.write_json(&file, &index)?;
        }

        Ok(())
    }

    fn generate_post_entries(
        &self,
        locale: &str,
        posts: &[ContentRecord],
        dir: &Path,
    ) -> Result<()> {
        let nav = |post: &ContentRecord| NavLink {
            title: post.title.clone(),
            url: self.routing.localized_path(&post.path(), Some(locale)),
        };

        for (i, post) in posts.iter().enumerate() {
            let entry = PostEntry {
                post,
                url: self.routing.url(&post.path(), Some(locale)),
                metadata: self.metadata(
                    locale,
                    &post.path(),
                    MetadataOptions::article(post, &self.routing),
                ),
                prev: posts.get(i + 1).map(nav),
                next: i.checked_sub(1).and_then(|j| posts.get(j)).map(nav),
            };
            let file = dir.join("posts").join(format!("{}.json", post.identifier));
            self.write_json(&file, &entry)?;
        }

        Ok(())
    }

    fn generate_categories(
        &self,
        aggregator: &Aggregator,
        posts: &[ContentRecord],
        dir: &Path,
    ) -> Result<()> {
        let locale = aggregator.locale();
        let categories = aggregator.group_by_category(posts);
        let prefix = self.messages.get_or(locale, "post.categoryPrefix", "Category");

        for category in &categories {
            let path = format!("/categories/{}", encode_segment(&category.id));
            let detail = TaxonDetail {
                id: category.id.clone(),
                title: category.title.clone(),
                count: category.count,
                metadata: self.metadata(locale, &path, taxon_page(&prefix, &category.title)),
                posts: aggregator
                    .filter_by_category(posts, &category.id)
                    .into_iter()
                    .map(|post| self.summary(post, locale))
                    .collect(),
            };
            let file = dir
                .join("categories")
                .join(format!("{}.json", encode_segment(&category.id)));
            self.write_json(&file, &detail)?;
        }

        let title = self.messages.get_or(locale, "categories.title", "Categories");
        let listing = Listing {
            metadata: self.metadata(
                locale,
                "/categories",
                MetadataOptions::website(title, self.site_description()),
            ),
            items: categories,
        };
        self.write_json(&dir.join("categories.json"), &listing)
    }

    fn generate_tags(
        &self,
        aggregator: &Aggregator,
        posts: &[ContentRecord],
        dir: &Path,
    ) -> Result<()> {
        let locale = aggregator.locale();
        let tags = aggregator.group_by_tag(posts);
        let prefix = self.messages.get_or(locale, "post.tagPrefix", "Tag");

        for tag in &tags {
            let path = format!("/tags/{}", encode_segment(&tag.id));
            let detail = TaxonDetail {
                id: tag.id.clone(),
                title: tag.title.clone(),
                count: tag.count,
                metadata: self.metadata(locale, &path, taxon_page(&prefix, &tag.title)),
                posts: aggregator
                    .filter_by_tag(posts, &tag.id)
                    .into_iter()
                    .map(|post| self.summary(post, locale))
                    .collect(),
            };
            let file = dir
                .join("tags")
                .join(format!("{}.json", encode_segment(&tag.id)));
            self.write_json(&file, &detail)?;
        }

        let title = self.messages.get_or(locale, "tags.title", "Tags");
        let listing = Listing {
            metadata: self.metadata(
                locale,
                "/tags",
                MetadataOptions::website(title, self.site_description()),
            ),
            items: tags,
        };
        self.write_json(&dir.join("tags.json"), &listing)
    }

    fn generate_pages(&self, locale: &str, dir: &Path) -> Result<()> {
        for page in self.store.pages(locale) {
            let entry = PageEntry {
                page,
                url: self.routing.url(&page.path(), Some(locale)),
                metadata: self.metadata(
                    locale,
                    &page.path(),
                    MetadataOptions::website(page.title.clone(), page.description.clone()),
                ),
            };
            let name = if page.identifier.is_empty() {
                "index"
            } else {
                &page.identifier
            };
            let file = dir.join("pages").join(format!("{}.json", name));
            self.write_json(&file, &entry)?;
        }

        Ok(())
    }

    /// Feed channel for one locale, limited to `feed_limit` newest posts
    fn generate_feed(
        &self,
        locale: &str,
        posts: &[ContentRecord],
        now: DateTime<Utc>,
        dir: &Path,
    ) -> Result<()> {
        let config = &self.site.config;
        let base_url = self.routing.base_url();
        let site_author = FeedAuthor {
            name: config.author.name.clone(),
            link: config.author.url.clone(),
        };

        let items = posts
            .iter()
            .take(config.feed_limit)
            .map(|post| {
                let url = self.routing.url(&post.path(), Some(locale));
                let author = resolve_author(post.author.as_ref(), &config.author);
                let description = post.description.clone().unwrap_or_default();
                FeedItem {
                    title: post.title.clone(),
                    id: url.clone(),
                    link: url,
                    content: description.clone(),
                    description,
                    author: vec![FeedAuthor {
                        name: author.name,
                        link: author.url.or_else(|| config.author.url.clone()),
                    }],
                    date: post.published_at,
                    image: post.cover.as_deref().map(|c| absolute(&self.routing, c)),
                    category: vec![FeedCategory {
                        name: post.category.title.clone(),
                        term: post.category.id.clone(),
                    }],
                    tags: post.tags.iter().map(|t| t.title.clone()).collect(),
                }
            })
            .collect();

        let feed = Feed {
            title: config.name.clone(),
            description: config.description.clone(),
            id: base_url.to_string(),
            link: self.routing.url("", Some(locale)),
            language: locale.to_string(),
            image: absolute(&self.routing, &config.logo),
            favicon: format!("{}/favicon.ico", base_url),
            copyright: format!("All rights reserved {}, {}", now.year(), config.author.name),
            updated: now,
            rss2: self.routing.url("/feed.xml", Some(locale)),
            author: site_author,
            items,
        };
        self.write_json(&dir.join("feed.json"), &feed)
    }

    fn generate_site_files(&self, now: DateTime<Utc>) -> Result<()> {
        self.write_json(
            Path::new("sitemap.json"),
            &sitemap(self.store, &self.routing, now),
        )?;
        self.write_json(
            Path::new("robots.json"),
            &seo::robots(&self.site.config, &self.routing),
        )?;

        let params = static_params(self.store);
        let routes: Vec<RouteEntry> = params
            .iter()
            .map(|param| RouteEntry {
                param,
                path: self
                    .routing
                    .localized_path(&param.path(), Some(&param.locale)),
            })
            .collect();
        self.write_json(Path::new("routes.json"), &routes)
    }

    fn summary(&self, post: &ContentRecord, locale: &str) -> PostSummary {
        PostSummary {
            identifier: post.identifier.clone(),
            url: self.routing.localized_path(&post.path(), Some(locale)),
            title: post.title.clone(),
            description: post.description.clone(),
            published_at: post.published_at,
            author: post.author.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            cover: post.cover.clone(),
            authored_locale: post.authored_locale.clone(),
        }
    }

    fn metadata(&self, locale: &str, path: &str, options: MetadataOptions) -> PageMetadata {
        generate_metadata(&self.site.config, &self.routing, locale, path, options)
    }

    fn site_description(&self) -> Option<String> {
        let description = &self.site.config.description;
        (!description.is_empty()).then(|| description.clone())
    }

    /// Write `value` as pretty JSON to `relative` under the public directory
    fn write_json<T: Serialize + ?Sized>(&self, relative: &Path, value: &T) -> Result<()> {
        let output_path = self.site.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(value)?;
        fs::write(&output_path, json)?;
        self.written.set(self.written.get() + 1);
        tracing::debug!("Generated {:?}", relative);

        Ok(())
    }
}

/// Metadata for a category or tag page: `Rust - Tag`, described as `Tag Rust`
fn taxon_page(prefix: &str, title: &str) -> MetadataOptions {
    MetadataOptions::website(
        format!("{} - {}", title, prefix),
        Some(format!("{} {}", prefix, title)),
    )
}
