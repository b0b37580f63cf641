use thiserror::Error;

/// Failures at the page-fetch boundary.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out after {timeout_ms}ms waiting for {url}")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
