use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use watchlist_models::{ItemId, MediaType, SearchResult};

use crate::error::SearchError;

#[derive(Debug, Deserialize)]
struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: i64,
    #[serde(default)]
    title: String,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TmdbShow {
    id: i64,
    #[serde(default)]
    name: String,
    overview: Option<String>,
    poster_path: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
}

/// Request parameters shared by both search endpoints
pub struct SearchRequest<'a> {
    pub base_url: &'a str,
    pub image_base_url: &'a str,
    pub api_key: &'a str,
    pub language: &'a str,
    pub query: &'a str,
}

impl SearchRequest<'_> {
    fn poster_url(&self, poster_path: Option<String>) -> Option<String> {
        poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", self.image_base_url, p))
    }
}

/// TMDB sends `""` for unknown dates
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /search/movie
pub async fn search_movies(client: &Client, request: &SearchRequest<'_>) -> Result<Vec<SearchResult>, SearchError> {
    let page: TmdbPage<TmdbMovie> = get_page(client, request, "movie").await?;
    Ok(page
        .results
        .into_iter()
        .map(|movie| SearchResult {
            id: ItemId(movie.id),
            title: movie.title,
            overview: non_empty(movie.overview),
            poster: request.poster_url(movie.poster_path),
            release_date: non_empty(movie.release_date),
            rating: movie.vote_average,
            media_type: MediaType::Movie,
        })
        .collect())
}

/// GET /search/tv. Series carry `name` and `first_air_date` instead of
/// `title` and `release_date`.
pub async fn search_tv(client: &Client, request: &SearchRequest<'_>) -> Result<Vec<SearchResult>, SearchError> {
    let page: TmdbPage<TmdbShow> = get_page(client, request, "tv").await?;
    Ok(page
        .results
        .into_iter()
        .map(|show| SearchResult {
            id: ItemId(show.id),
            title: show.name,
            overview: non_empty(show.overview),
            poster: request.poster_url(show.poster_path),
            release_date: non_empty(show.first_air_date),
            rating: show.vote_average,
            media_type: MediaType::Tv,
        })
        .collect())
}

async fn get_page<T>(client: &Client, request: &SearchRequest<'_>, kind: &str) -> Result<TmdbPage<T>, SearchError>
where
    T: for<'de> Deserialize<'de>,
{
    let url = format!("{}/search/{}", request.base_url.trim_end_matches('/'), kind);
    debug!("TMDB search {}: '{}'", kind, request.query);

    let response = client
        .get(&url)
        .query(&[
            ("api_key", request.api_key),
            ("language", request.language),
            ("query", request.query),
        ])
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| SearchError::Transport {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        warn!("TMDB search {} failed: HTTP {} - {}", kind, status, error_text);
        return Err(match status {
            StatusCode::UNAUTHORIZED => SearchError::NotConfigured("TMDB rejected the API key".to_string()),
            _ => SearchError::Status {
                status: status.as_u16(),
                message: status_message(&error_text),
            },
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| SearchError::Transport { url, source })?;
    serde_json::from_str(&body).map_err(|e| SearchError::Decode(e.to_string()))
}

/// TMDB errors look like `{"status_code": 7, "status_message": "..."}`
fn status_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("status_message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
