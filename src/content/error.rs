//! Content errors

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading post sources
///
/// All of these abort the build step that hit them.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No markup file exists for the requested identifier
    #[error("no content found for {identifier:?}")]
    NotFound { identifier: String },

    /// The content directory or a file in it could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A content file is not UTF-8 text
    #[error("{path:?} is not valid UTF-8")]
    Encoding { path: PathBuf },

    /// The front-matter block exists but cannot be parsed
    #[error("invalid front-matter in {identifier:?}: {message}")]
    FrontMatter { identifier: String, message: String },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is a missing-content error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
