use thiserror::Error;

/// Failure of a metadata search, by category
#[derive(Debug, Error)]
pub enum SearchError {
    /// No API key, or the provider rejected the one we have
    #[error("metadata search is not configured: {0}")]
    NotConfigured(String),

    #[error("search request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("search provider answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected search response: {0}")]
    Decode(String),
}

impl SearchError {
    pub fn is_not_configured(&self) -> bool {
        matches!(self, SearchError::NotConfigured(_))
    }
}
