//! Content store - the per-locale cache of loaded posts and pages
//!
//! The store is populated once at startup and never invalidated while the
//! process runs. Callers hold it by reference; nothing in the crate reloads
//! content behind their back.

use anyhow::Result;
use std::collections::{BTreeMap, HashSet};

use crate::config::SiteConfig;
use crate::content::{ContentLoader, ContentRecord, Localized, PageRecord};
use crate::error::ContentError;

/// Posts and pages for every configured locale
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    locales: Vec<String>,
    posts: BTreeMap<String, Vec<ContentRecord>>,
    pages: BTreeMap<String, Vec<PageRecord>>,
}

impl ContentStore {
    /// Load everything the content source has to offer
    pub fn populate(loader: &ContentLoader, config: &SiteConfig) -> Result<Self> {
        let posts = loader.load_posts()?;
        let pages = loader.load_pages()?;
        let store = Self::from_records(config, posts, pages);
        tracing::info!(
            "Loaded {} posts and {} pages across {} locales",
            store.posts.values().map(Vec::len).sum::<usize>(),
            store.pages.values().map(Vec::len).sum::<usize>(),
            store.locales.len()
        );
        Ok(store)
    }

    /// Build a store from records already in memory
    pub fn from_records(
        config: &SiteConfig,
        posts: Vec<ContentRecord>,
        pages: Vec<PageRecord>,
    ) -> Self {
        Self {
            locales: config.locales.clone(),
            posts: partition(config, posts),
            pages: partition(config, pages),
        }
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Posts visible in `locale`, in load order; empty for an unknown locale
    pub fn posts(&self, locale: &str) -> &[ContentRecord] {
        self.posts.get(locale).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pages(&self, locale: &str) -> &[PageRecord] {
        self.pages.get(locale).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up a post by its slug path
    pub fn post(&self, locale: &str, slugs: &[&str]) -> Option<&ContentRecord> {
        let identifier = slugs.join("/");
        self.posts(locale).iter().find(|p| p.identifier == identifier)
    }

    /// Look up a page by its slug path
    pub fn page(&self, locale: &str, slugs: &[&str]) -> Option<&PageRecord> {
        let identifier = slugs.join("/");
        self.pages(locale).iter().find(|p| p.identifier == identifier)
    }

    /// Every `(locale, identifier)` pair with a post
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.locales.iter().flat_map(move |locale| {
            self.posts(locale)
                .iter()
                .map(move |p| (locale.as_str(), p.identifier.as_str()))
        })
    }

    /// Check that `locale` is one this store serves
    pub fn require_locale(&self, locale: &str) -> Result<(), ContentError> {
        if self.locales.iter().any(|l| l == locale) {
            Ok(())
        } else {
            Err(ContentError::UnknownLocale(locale.to_string()))
        }
    }
}

/// Group records by locale, dropping duplicate identifiers and projecting
/// untranslated default-locale records into the other locales.
fn partition<R>(config: &SiteConfig, records: Vec<R>) -> BTreeMap<String, Vec<R>>
where
    R: Localized + Clone,
{
    let mut by_locale: BTreeMap<String, Vec<R>> = config
        .locales
        .iter()
        .map(|l| (l.clone(), Vec::new()))
        .collect();

    let mut seen: HashSet<(String, String)> = HashSet::new();
    for record in records {
        let key = (record.locale().to_string(), record.identifier().to_string());
        if !seen.insert(key) {
            let err = ContentError::DuplicateIdentifier {
                locale: record.locale().to_string(),
                identifier: record.identifier().to_string(),
            };
            tracing::warn!("{}", err);
            continue;
        }
        match by_locale.get_mut(record.locale()) {
            Some(bucket) => bucket.push(record),
            None => tracing::warn!(
                "Ignoring {}: locale `{}` is not configured",
                record.identifier(),
                record.locale()
            ),
        }
    }

    let defaults = by_locale
        .get(&config.default_locale)
        .cloned()
        .unwrap_or_default();

    for (locale, bucket) in by_locale.iter_mut() {
        if *locale == config.default_locale {
            continue;
        }
        let translated: HashSet<String> =
            bucket.iter().map(|r| r.identifier().to_string()).collect();
        let mut projected = 0;
        for record in &defaults {
            if !translated.contains(record.identifier()) {
                bucket.push(record.project_into(locale));
                projected += 1;
            }
        }
        if projected > 0 {
            tracing::debug!("Projected {} records into locale {}", projected, locale);
        }
    }

    by_locale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::record;

    fn config() -> SiteConfig {
        SiteConfig {
            locales: vec!["en".into(), "zh".into()],
            default_locale: "en".into(),
            ..Default::default()
        }
    }

    fn in_locale(mut post: ContentRecord, locale: &str) -> ContentRecord {
        post.locale = locale.to_string();
        post.authored_locale = locale.to_string();
        post
    }

    #[test]
    fn test_untranslated_posts_are_projected() {
        let posts = vec![
            record("hello", (2024, 1, 1), "X"),
            record("world", (2024, 1, 2), "X"),
            in_locale(record("hello", (2024, 1, 1), "X"), "zh"),
        ];
        let store = ContentStore::from_records(&config(), posts, Vec::new());

        assert_eq!(store.posts("en").len(), 2);
        let zh = store.posts("zh");
        assert_eq!(zh.len(), 2);
        assert_eq!(zh[0].authored_locale, "zh");
        assert_eq!(zh[1].identifier, "world");
        assert_eq!(zh[1].locale, "zh");
        assert!(zh[1].is_projected());
    }

    #[test]
    fn test_duplicate_identifiers_are_dropped() {
        let mut second = record("hello", (2030, 1, 1), "Y");
        second.title = "Second".into();
        let posts = vec![record("hello", (2024, 1, 1), "X"), second];
        let store = ContentStore::from_records(&config(), posts, Vec::new());

        assert_eq!(store.posts("en").len(), 1);
        assert_eq!(store.posts("en")[0].title, "HELLO");
    }

    #[test]
    fn test_unconfigured_locale_is_ignored() {
        let posts = vec![in_locale(record("bonjour", (2024, 1, 1), "X"), "fr")];
        let store = ContentStore::from_records(&config(), posts, Vec::new());
        assert!(store.posts("fr").is_empty());
        assert!(store.posts("en").is_empty());
        assert!(store.require_locale("fr").is_err());
        assert!(store.require_locale("zh").is_ok());
    }

    #[test]
    fn test_lookup_by_slugs() {
        let posts = vec![record("guides/setup", (2024, 1, 1), "X")];
        let store = ContentStore::from_records(&config(), posts, Vec::new());

        assert!(store.post("en", &["guides", "setup"]).is_some());
        assert!(store.post("zh", &["guides", "setup"]).is_some());
        assert!(store.post("en", &["setup"]).is_none());
        assert!(store.page("en", &["about"]).is_none());
    }

    #[test]
    fn test_entries_enumerates_every_locale() {
        let posts = vec![
            record("a", (2024, 1, 1), "X"),
            in_locale(record("b", (2024, 1, 1), "X"), "zh"),
        ];
        let store = ContentStore::from_records(&config(), posts, Vec::new());
        let entries: Vec<_> = store.entries().collect();
        assert_eq!(entries, vec![("en", "a"), ("zh", "b"), ("zh", "a")]);
    }
}
