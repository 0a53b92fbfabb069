use async_trait::async_trait;
use watchlist_models::SearchResult;

use crate::error::SearchError;

/// Free-text lookup of movies and series
#[async_trait]
pub trait MetadataSearch: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Movies first, then series. A blank query yields no results.
    async fn search_all(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}
