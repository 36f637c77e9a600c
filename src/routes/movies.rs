use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppResult, models::Movie, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Searches movies; a blank `q` returns the popularity-sorted listing
///
/// Like the search screen, the query is sent and recorded exactly as typed;
/// only the blank check ignores surrounding whitespace. The first result of
/// a non-blank query is recorded as a search hit in the background.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let blank = params.q.trim().is_empty();
    let query = if blank { "" } else { params.q.as_str() };
    let movies = state.remote.search_movies(query).await?;

    tracing::debug!(query = %query, results = movies.len(), "Gateway search");

    if let Some(first) = movies.first().filter(|_| !blank) {
        let _ = state
            .tracker
            .spawn_search_hit(query.to_string(), first.clone());
    }

    Ok(Json(movies))
}
