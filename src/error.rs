//! Error types for the catalog pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("malformed food record at line {line}: {content:?}")]
    MalformedFoodRecord { line: usize, content: String },

    #[error("malformed category record at line {line}: {content:?}")]
    MalformedCategoryRecord { line: usize, content: String },

    #[error("no label for category {code} (first used by food record at line {line})")]
    MissingCategoryLabel { code: String, line: usize },

    #[error("label for category {code} has no letters (first used by food record at line {line})")]
    EmptyCategoryLabel { code: String, line: usize },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
