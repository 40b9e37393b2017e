//! Content module - post and page records and the loader that reads them

mod frontmatter;
pub mod loader;
mod record;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub use record::{Author, ContentRecord, Localized, PageRecord, Taxon};

#[cfg(test)]
pub(crate) use record::fixtures;
