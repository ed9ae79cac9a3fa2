use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the individual export components.
///
/// Fatal conditions bubble up to `main` wrapped in `anyhow` context;
/// per-collection conditions are logged by the caller and replaced with
/// empty values.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed XML in {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;
