//! Error types for the content source

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while loading content from disk
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{path:?}: missing required front-matter field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("{path:?}: invalid date `{value}`")]
    InvalidDate { path: PathBuf, value: String },

    #[error("{path:?}: front-matter error: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("{path:?}: a post needs a slug; `index` only names a post inside its own directory")]
    EmptyIdentifier { path: PathBuf },

    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    #[error("Duplicate identifier `{identifier}` in locale `{locale}`")]
    DuplicateIdentifier { locale: String, identifier: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
