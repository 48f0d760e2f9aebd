use thiserror::Error;

/// Failures on the fetch/load path. The store never retries; every failure
/// is returned to the caller, which decides whether to abort or recover.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate source request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("snapshot file access failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed rate snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("no usable rate for origin currency {0}")]
    UnsupportedOrigin(String),
}
