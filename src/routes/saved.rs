use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Movie, SavedMovie, User},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct SavedStatus {
    pub saved: bool,
    pub document_id: Option<String>,
}

pub async fn list_saved(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Vec<SavedMovie>>> {
    let saved = state.registry.list_saved_for_user(&user.id).await?;
    Ok(Json(saved))
}

/// Bookmarks the movie in the body for the caller
pub async fn save_movie(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(movie): Json<Movie>,
) -> AppResult<(StatusCode, Json<SavedMovie>)> {
    let saved = state.registry.save(&user.id, &movie).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn saved_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<SavedStatus>> {
    let document_id = state.registry.is_saved(&user.id, movie_id).await?;
    Ok(Json(SavedStatus {
        saved: document_id.is_some(),
        document_id,
    }))
}

/// Removes one of the caller's bookmarks; another user's bookmark is refused
pub async fn unsave_movie(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(document_id): Path<String>,
) -> AppResult<StatusCode> {
    state.registry.unsave_owned(&user.id, &document_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
