//! List site content

use anyhow::{bail, Result};

use crate::aggregate::Aggregator;
use crate::content::ContentLoader;
use crate::i18n::LocaleRouting;
use crate::routes::static_params;
use crate::store::ContentStore;
use crate::Polypress;

/// Options for `polypress list`
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Locale to list; the default locale when absent
    pub locale: Option<String>,
    /// 1-indexed page of posts
    pub page: Option<usize>,
    /// Posts per page; the configured `per_page` when absent
    pub size: Option<usize>,
}

/// List site content by type
pub fn run(site: &Polypress, content_type: &str, options: &ListOptions) -> Result<()> {
    let loader = ContentLoader::new(site);
    let store = ContentStore::populate(&loader, &site.config)?;

    for line in render(site, &store, content_type, options)? {
        println!("{}", line);
    }
    Ok(())
}

/// Lines `polypress list` prints for `content_type`
pub fn render(
    site: &Polypress,
    store: &ContentStore,
    content_type: &str,
    options: &ListOptions,
) -> Result<Vec<String>> {
    let locale = options
        .locale
        .as_deref()
        .unwrap_or(&site.config.default_locale);
    store.require_locale(locale)?;

    let aggregator = Aggregator::new(locale, &site.config.author);
    let posts = aggregator.list_by_recency(store.posts(locale));
    let mut lines = Vec::new();

    match content_type {
        "post" | "posts" => {
            let page = options.page.unwrap_or(1);
            let size = options.size.unwrap_or(site.config.per_page);
            let window = aggregator.paginate(&posts, page, size);
            lines.push(format!(
                "Posts ({}) - page {} of {}:",
                window.total,
                window.page,
                window.total_pages().max(1)
            ));
            for post in &window.items {
                let marker = if post.is_projected() {
                    format!(" ({})", post.authored_locale)
                } else {
                    String::new()
                };
                lines.push(format!(
                    "  {} - {} [{}]{}",
                    post.published_at.format("%Y-%m-%d"),
                    post.title,
                    post.identifier,
                    marker
                ));
            }
        }
        "page" | "pages" => {
            let pages = store.pages(locale);
            lines.push(format!("Pages ({}):", pages.len()));
            for page in pages {
                lines.push(format!("  {} [{}]", page.title, page.path()));
            }
        }
        "tag" | "tags" => {
            let tags = aggregator.group_by_tag(&posts);
            lines.push(format!("Tags ({}):", tags.len()));
            for tag in tags {
                lines.push(format!("  {} [{}] ({})", tag.title, tag.id, tag.count));
            }
        }
        "category" | "categories" => {
            let categories = aggregator.group_by_category(&posts);
            lines.push(format!("Categories ({}):", categories.len()));
            for category in categories {
                lines.push(format!(
                    "  {} [{}] ({})",
                    category.title, category.id, category.count
                ));
            }
        }
        "route" | "routes" => {
            let routing = LocaleRouting::new(&site.config);
            let params: Vec<_> = static_params(store)
                .into_iter()
                .filter(|p| p.locale == locale)
                .collect();
            lines.push(format!("Routes ({}):", params.len()));
            for param in params {
                lines.push(format!(
                    "  {}",
                    routing.localized_path(&param.path(), Some(locale))
                ));
            }
        }
        _ => {
            bail!(
                "Unknown type: {}. Available: post, page, tag, category, route",
                content_type
            );
        }
    }

    Ok(lines)
}
