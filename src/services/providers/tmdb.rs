//! TMDB (The Movie Database) provider
//!
//! API Flow:
//! 1. Text search: /search/movie?query=...
//! 2. Default listing: /discover/movie?sort_by=popularity.desc

use crate::{
    error::{AppError, AppResult},
    models::{Movie, TmdbPage},
    services::providers::MovieProvider,
};
use reqwest::Client as HttpClient;

const DISCOVER_SORT: &str = "popularity.desc";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint path and query parameters for a search request
    fn endpoint_for(&self, query: &str) -> (String, Vec<(&'static str, String)>) {
        if query.is_empty() {
            (
                format!("{}/discover/movie", self.api_url),
                vec![("sort_by", DISCOVER_SORT.to_string())],
            )
        } else {
            (
                format!("{}/search/movie", self.api_url),
                vec![("query", query.to_string())],
            )
        }
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        let (url, params) = self.endpoint_for(query);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                query = %query,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::Upstream(format!(
                "Failed to fetch movies: status {}: {}",
                status, body
            )));
        }

        let page: TmdbPage = response.json().await?;

        tracing::info!(
            query = %query,
            results = page.results.len(),
            total_results = page.total_results,
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(page.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
