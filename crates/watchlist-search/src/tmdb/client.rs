use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;
use watchlist_config::SearchConfig;
use watchlist_models::SearchResult;

use crate::error::SearchError;
use crate::tmdb::api::{self, SearchRequest};
use crate::traits::MetadataSearch;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: Option<String>,
    config: SearchConfig,
}

impl TmdbClient {
    pub fn new(api_key: Option<String>, config: SearchConfig) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            config,
        }
    }

    pub fn with_client(mut self, client: Arc<Client>) -> Self {
        self.client = client;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn request<'a>(&'a self, query: &'a str) -> Result<SearchRequest<'a>, SearchError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SearchError::NotConfigured("no TMDB API key set (run `watchlist config tmdb`)".to_string())
        })?;
        Ok(SearchRequest {
            base_url: &self.config.base_url,
            image_base_url: &self.config.image_base_url,
            api_key,
            language: &self.config.language,
            query,
        })
    }

    pub async fn search_movies(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let mut results = api::search_movies(&self.client, &self.request(query)?).await?;
        results.truncate(self.config.results_per_type);
        Ok(results)
    }

    pub async fn search_tv(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let mut results = api::search_tv(&self.client, &self.request(query)?).await?;
        results.truncate(self.config.results_per_type);
        Ok(results)
    }
}

#[async_trait]
impl MetadataSearch for TmdbClient {
    fn provider_name(&self) -> &str {
        "tmdb"
    }

    async fn search_all(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        // fail before spawning either request
        self.request(query)?;

        let (mut movies, series) = tokio::try_join!(self.search_movies(query), self.search_tv(query))?;
        info!(
            "TMDB search '{}': {} movies, {} series",
            query,
            movies.len(),
            series.len()
        );
        movies.extend(series);
        Ok(movies)
    }
}
