use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult, models::SearchPopularityRecord, routes::AppState,
    services::PopularityTracker,
};

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    limit: Option<usize>,
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingQuery>,
) -> AppResult<Json<Vec<SearchPopularityRecord>>> {
    let limit = match params.limit {
        Some(limit) => PopularityTracker::checked_limit(Some(limit))?,
        None => state.trending_limit,
    };

    let records = state.tracker.get_trending(limit).await?;
    Ok(Json(records))
}
