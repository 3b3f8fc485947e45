//! Error types for quizpress.
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use thiserror::Error;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Errors returned from main are shown through Debug, while thiserror implements Display.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

/// Errors while talking to the platform API. Any of them aborts the fetch it happened in.
#[derive(Error)]
pub enum FetchError {
    #[error("Failed to create HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Malformed response from {url}: {reason}")]
    MalformedPayload { url: String, reason: String },
    #[error("Failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error)]
pub enum ContentError {
    #[error("Failed to read curated content file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse curated content from {origin}")]
    ParseFailed {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error)]
pub enum BuildError {
    #[error("Failed to clean output directory: {path}")]
    CleanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to copy static file {path}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error)]
pub enum QuizpressError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl_debug_for_error!(FetchError, ContentError, BuildError, QuizpressError);
