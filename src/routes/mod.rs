//! Route enumeration for static generation and the sitemap

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use crate::aggregate::{group_by_category, group_by_tag, LocaleCollator};
use crate::i18n::LocaleRouting;
use crate::seo::absolute;
use crate::store::ContentStore;

/// Characters escaped inside one path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a taxonomy id for use as a URL segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// URL of page `page` of a paginated listing
pub fn page_url(base_path: &str, page: usize) -> String {
    if page <= 1 {
        base_path.to_string()
    } else {
        format!("{}?page={}", base_path, page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Post,
    Page,
    Category,
    Tag,
}

/// One page the static-generation driver must render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticParam {
    pub locale: String,
    pub kind: RouteKind,
    pub id: String,
}

impl StaticParam {
    /// Site-relative path, without locale prefix
    pub fn path(&self) -> String {
        match self.kind {
            RouteKind::Post => format!("/posts/{}", self.id),
            RouteKind::Page => format!("/{}", self.id),
            RouteKind::Category => format!("/categories/{}", encode_segment(&self.id)),
            RouteKind::Tag => format!("/tags/{}", encode_segment(&self.id)),
        }
    }
}

/// Every post, page, category and tag route in every locale
pub fn static_params(store: &ContentStore) -> Vec<StaticParam> {
    let mut params = Vec::new();

    for locale in store.locales() {
        let collator = LocaleCollator::new(locale);
        let posts = store.posts(locale);
        let param = |kind, id: &str| StaticParam {
            locale: locale.clone(),
            kind,
            id: id.to_string(),
        };

        params.extend(posts.iter().map(|p| param(RouteKind::Post, &p.identifier)));
        params.extend(
            store
                .pages(locale)
                .iter()
                .map(|p| param(RouteKind::Page, &p.identifier)),
        );
        params.extend(
            group_by_category(posts, &collator)
                .iter()
                .map(|c| param(RouteKind::Category, &c.id)),
        );
        params.extend(
            group_by_tag(posts, &collator)
                .iter()
                .map(|t| param(RouteKind::Tag, &t.id)),
        );
    }

    params
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: String,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
    pub alternates: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// Sitemap entries for every locale. Listing pages are stamped with `now`,
/// posts with their publish date.
pub fn sitemap(
    store: &ContentStore,
    routing: &LocaleRouting,
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let stamp = |t: DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Secs, true);
    let entry = |locale: &str, path: &str, modified, change_frequency, priority| SitemapEntry {
        url: routing.url(path, Some(locale)),
        last_modified: stamp(modified),
        change_frequency,
        priority,
        alternates: routing.alternates(path),
        images: Vec::new(),
    };

    let mut entries = Vec::new();
    for locale in store.locales().iter().map(String::as_str) {
        entries.push(entry(locale, "", now, ChangeFrequency::Daily, 1.0));
        entries.push(entry(locale, "/posts", now, ChangeFrequency::Daily, 0.9));
        entries.push(entry(locale, "/categories", now, ChangeFrequency::Weekly, 0.8));
        entries.push(entry(locale, "/tags", now, ChangeFrequency::Weekly, 0.8));

        let posts = store.posts(locale);
        for post in posts {
            let mut item = entry(
                locale,
                &post.path(),
                post.published_at,
                ChangeFrequency::Monthly,
                0.8,
            );
            item.images = post
                .cover
                .iter()
                .map(|cover| absolute(routing, cover))
                .collect();
            entries.push(item);
        }

        let collator = LocaleCollator::new(locale);
        for category in group_by_category(posts, &collator) {
            let path = format!("/categories/{}", encode_segment(&category.id));
            entries.push(entry(locale, &path, now, ChangeFrequency::Weekly, 0.7));
        }
        for tag in group_by_tag(posts, &collator) {
            let path = format!("/tags/{}", encode_segment(&tag.id));
            entries.push(entry(locale, &path, now, ChangeFrequency::Weekly, 0.6));
        }
    }

    entries
}
