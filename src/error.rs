//! Error types.
//!
//! Page fetches fail with [`FetchError`], which always leaves the store in a
//! retryable state.  A single malformed record inside an otherwise valid page
//! is a [`RecordError`] and only drops that record.  The offline generator
//! has its own [`GenerateError`].

use std::path::PathBuf;

use thiserror::Error;

/// Why a page could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response body (DNS, connect, reset, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: u16 },

    /// The body was not valid JSON, or not an array of objects.
    #[error("invalid page payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// `true` for network and HTTP failures, `false` for payload problems.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Http { .. })
    }
}

/// A single page entry that could not become a [`crate::source::Record`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing or non-string field `{field}`")]
    FieldMissing { field: &'static str },
}

/// Failures of the `generate` batch job.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("an image API access key is required (--access-key or UNSPLASH_ACCESS_KEY)")]
    MissingAccessKey,

    #[error("image API returned no photos")]
    NoImages,
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}
