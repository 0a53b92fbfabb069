use std::path::PathBuf;
use thiserror::Error;
use watchlist_models::ItemId;

/// Raw failure of a list store.
///
/// Stores report what happened and nothing more; deciding whether a failure
/// warrants falling back to another store is the sync layer's job.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend has no connection configured (or says so itself)
    #[error("list backend is not configured: {0}")]
    NotConfigured(String),

    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error("item {0} is already in the list")]
    Conflict(ItemId),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("local store {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode list: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether the failure means the store couldn't be used at all, as opposed
    /// to the store giving a definitive answer (not found, conflict).
    pub fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            StoreError::NotConfigured(_)
                | StoreError::Transport { .. }
                | StoreError::Status { .. }
                | StoreError::Decode { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
