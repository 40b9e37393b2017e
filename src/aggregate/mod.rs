//! Aggregation over a locale's posts: recency ordering, pagination,
//! category and tag summaries, and taxonomy filters.
//!
//! Every function here is a pure function of its arguments. Empty inputs,
//! pages past the end and unmatched filters produce empty results rather
//! than errors, and repeated calls with the same input return identical
//! output.

mod collation;

pub use collation::{ByteOrderCollator, Collator, LocaleCollator};

use indexmap::IndexMap;
use serde::Serialize;

use crate::content::{Author, ContentRecord, Taxon};

/// A category with the number of posts filed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub title: String,
    pub count: usize,
}

/// A tag with the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub id: String,
    pub title: String,
    pub count: usize,
}

/// One page of an ordered collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow<T> {
    /// 1-indexed page number, as requested
    pub page: usize,
    pub size: usize,
    /// Length of the whole collection
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> PageWindow<T> {
    /// Number of pages needed for `total` items
    pub fn total_pages(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }

    pub fn prev_page(&self) -> Option<usize> {
        (self.page > 1).then(|| (self.page - 1).min(self.total_pages().max(1)))
    }

    pub fn next_page(&self) -> Option<usize> {
        (self.page < self.total_pages()).then(|| self.page + 1)
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageWindow<U> {
        PageWindow {
            page: self.page,
            size: self.size,
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// The record's own author, or the site default when it has none
pub fn resolve_author(author: Option<&Author>, default: &Author) -> Author {
    author.cloned().unwrap_or_else(|| default.clone())
}

/// Posts newest first, each with its author resolved against `default_author`.
///
/// The sort is stable: posts published at the same instant keep their input
/// order.
pub fn list_by_recency(records: &[ContentRecord], default_author: &Author) -> Vec<ContentRecord> {
    let mut ordered: Vec<ContentRecord> = records
        .iter()
        .map(|record| ContentRecord {
            author: Some(resolve_author(record.author.as_ref(), default_author)),
            ..record.clone()
        })
        .collect();
    ordered.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    ordered
}

/// Slice out page `page` (1-indexed) of `size` items.
///
/// Out-of-range input is clamped: page 0 reads like page 1, a page past the
/// end yields no items, and `size == 0` yields no items. `total` is always
/// the full length of `items`.
pub fn paginate<T: Clone>(items: &[T], page: usize, size: usize) -> PageWindow<T> {
    let total = items.len();
    let start = page.saturating_sub(1).saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);

    PageWindow {
        page,
        size,
        total,
        items: items[start..end].to_vec(),
    }
}

/// Read a `?page=` query value; anything other than a positive integer is page 1
pub fn parse_page_param(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

/// Count posts per category id; the first title seen for an id wins
pub fn group_by_category<'a, I>(records: I, collator: &dyn Collator) -> Vec<CategorySummary>
where
    I: IntoIterator<Item = &'a ContentRecord>,
{
    let counts = count_taxa(records.into_iter().map(|r| std::iter::once(&r.category)));
    sorted_summaries(counts, collator)
        .into_iter()
        .map(|(id, title, count)| CategorySummary { id, title, count })
        .collect()
}

/// Count posts per tag id; a post counts once toward each of its tags
pub fn group_by_tag<'a, I>(records: I, collator: &dyn Collator) -> Vec<TagSummary>
where
    I: IntoIterator<Item = &'a ContentRecord>,
{
    let counts = count_taxa(records.into_iter().map(|r| r.tags.iter()));
    sorted_summaries(counts, collator)
        .into_iter()
        .map(|(id, title, count)| TagSummary { id, title, count })
        .collect()
}

/// Posts filed under `category_id`, in input order
pub fn filter_by_category<'a>(
    records: &'a [ContentRecord],
    category_id: &str,
) -> Vec<&'a ContentRecord> {
    records
        .iter()
        .filter(|r| r.category.id == category_id)
        .collect()
}

/// Posts carrying `tag_id`, in input order
pub fn filter_by_tag<'a>(records: &'a [ContentRecord], tag_id: &str) -> Vec<&'a ContentRecord> {
    records.iter().filter(|r| r.has_tag(tag_id)).collect()
}

/// Insertion-ordered `id -> (first title, count)` over every taxon of every record
fn count_taxa<'a, R, T>(records: R) -> IndexMap<&'a str, (&'a str, usize)>
where
    R: Iterator<Item = T>,
    T: Iterator<Item = &'a Taxon>,
{
    let mut counts: IndexMap<&str, (&str, usize)> = IndexMap::new();
    for taxa in records {
        for taxon in taxa {
            counts
                .entry(taxon.id.as_str())
                .or_insert((taxon.title.as_str(), 0))
                .1 += 1;
        }
    }
    counts
}

/// Order by title under `collator`, falling back to id for equal titles
fn sorted_summaries(
    counts: IndexMap<&str, (&str, usize)>,
    collator: &dyn Collator,
) -> Vec<(String, String, usize)> {
    let mut entries: Vec<_> = counts.into_iter().collect();
    entries.sort_by(|(a_id, (a_title, _)), (b_id, (b_title, _))| {
        collator.compare(a_title, b_title).then_with(|| a_id.cmp(b_id))
    });
    entries
        .into_iter()
        .map(|(id, (title, count))| (id.to_string(), title.to_string(), count))
        .collect()
}

/// The aggregation functions bound to one locale view
pub struct Aggregator<'a> {
    locale: &'a str,
    default_author: &'a Author,
    collator: Box<dyn Collator + 'a>,
}

impl<'a> Aggregator<'a> {
    /// Aggregator using [`LocaleCollator`] for `locale`
    pub fn new(locale: &'a str, default_author: &'a Author) -> Self {
        Self::with_collator(locale, default_author, Box::new(LocaleCollator::new(locale)))
    }

    pub fn with_collator(
        locale: &'a str,
        default_author: &'a Author,
        collator: Box<dyn Collator + 'a>,
    ) -> Self {
        Self {
            locale,
            default_author,
            collator,
        }
    }

    pub fn locale(&self) -> &str {
        self.locale
    }

    /// Newest-first posts of this locale; records from other locales are dropped
    pub fn list_by_recency(&self, records: &[ContentRecord]) -> Vec<ContentRecord> {
        let mut in_locale: Vec<ContentRecord> = Vec::with_capacity(records.len());
        for record in records {
            if record.locale == self.locale {
                in_locale.push(record.clone());
            } else {
                tracing::debug!(
                    "Ignoring {} ({}) in {} view",
                    record.identifier,
                    record.locale,
                    self.locale
                );
            }
        }
        list_by_recency(&in_locale, self.default_author)
    }

    pub fn paginate<T: Clone>(&self, items: &[T], page: usize, size: usize) -> PageWindow<T> {
        paginate(items, page, size)
    }

    pub fn group_by_category(&self, records: &[ContentRecord]) -> Vec<CategorySummary> {
        group_by_category(records, self.collator.as_ref())
    }

    pub fn group_by_tag(&self, records: &[ContentRecord]) -> Vec<TagSummary> {
        group_by_tag(records, self.collator.as_ref())
    }

    pub fn filter_by_category<'r>(
        &self,
        records: &'r [ContentRecord],
        category_id: &str,
    ) -> Vec<&'r ContentRecord> {
        filter_by_category(records, category_id)
    }

    pub fn filter_by_tag<'r>(
        &self,
        records: &'r [ContentRecord],
        tag_id: &str,
    ) -> Vec<&'r ContentRecord> {
        filter_by_tag(records, tag_id)
    }
}
