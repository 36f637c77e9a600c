use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{DocumentId, DocumentQuery, Movie, Permission, SavedMovie},
    services::remote::RemoteDataClient,
};

/// Per-user bookmarks of movies
///
/// Uniqueness of (user, movie) is not enforced by the store. `save` always
/// creates; callers decide between save and unsave from `is_saved`.
pub struct SavedMoviesRegistry {
    remote: Arc<RemoteDataClient>,
    collection: String,
}

impl SavedMoviesRegistry {
    pub fn new(remote: Arc<RemoteDataClient>, collection: String) -> Self {
        Self { remote, collection }
    }

    /// Document id of the user's bookmark for this movie, if any
    ///
    /// With duplicate bookmarks the first one the store returns wins.
    pub async fn is_saved(&self, user_id: &str, movie_id: i64) -> AppResult<Option<String>> {
        let documents = self
            .remote
            .query_documents(
                &self.collection,
                &DocumentQuery::new()
                    .equal("userId", user_id)
                    .equal("movieId", movie_id),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user_id, movie_id, "Error checking saved status");
                e
            })?;

        Ok(documents.into_iter().next().map(|doc| doc.id))
    }

    /// Creates a new bookmark readable and deletable only by its owner
    pub async fn save(&self, user_id: &str, movie: &Movie) -> AppResult<SavedMovie> {
        let document = self
            .remote
            .create_document(
                &self.collection,
                DocumentId::generate(),
                SavedMovie::fields(user_id, movie, Utc::now()),
                Permission::owner(user_id),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user_id, movie_id = movie.id, "Error saving movie");
                e
            })?;

        tracing::info!(
            user_id = %user_id,
            movie_id = movie.id,
            document_id = %document.id,
            "Movie saved"
        );

        document.decode()
    }

    /// Saves unless a bookmark already exists; returns the bookmark's document id
    ///
    /// Best effort: two concurrent callers can still both create.
    pub async fn ensure_saved(&self, user_id: &str, movie: &Movie) -> AppResult<String> {
        if let Some(existing) = self.is_saved(user_id, movie.id).await? {
            return Ok(existing);
        }
        Ok(self.save(user_id, movie).await?.id)
    }

    /// Deletes a bookmark. Deleting one that is already gone succeeds.
    pub async fn unsave(&self, document_id: &str) -> AppResult<()> {
        match self
            .remote
            .delete_document(&self.collection, document_id)
            .await
        {
            Ok(()) => {
                tracing::info!(document_id = %document_id, "Movie unsaved");
                Ok(())
            }
            Err(AppError::NotFound(_)) => {
                tracing::debug!(document_id = %document_id, "Saved movie already removed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, document_id = %document_id, "Error unsaving movie");
                Err(e)
            }
        }
    }

    /// Deletes a bookmark on behalf of `user_id`
    ///
    /// A bookmark owned by someone else is refused with `Forbidden`; one that
    /// is already gone succeeds like `unsave`.
    pub async fn unsave_owned(&self, user_id: &str, document_id: &str) -> AppResult<()> {
        let document = match self
            .remote
            .get_document(&self.collection, document_id)
            .await
        {
            Ok(document) => document,
            Err(AppError::NotFound(_)) => {
                tracing::debug!(document_id = %document_id, "Saved movie already removed");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let saved: SavedMovie = document.decode()?;
        if saved.user_id != user_id {
            tracing::warn!(
                user_id = %user_id,
                owner = %saved.user_id,
                document_id = %document_id,
                "Refusing to unsave another user's movie"
            );
            return Err(AppError::Forbidden(
                "Saved movie belongs to another user".to_string(),
            ));
        }

        self.unsave(document_id).await
    }

    /// All of the user's bookmarks, most recently saved first
    pub async fn list_saved_for_user(&self, user_id: &str) -> AppResult<Vec<SavedMovie>> {
        let documents = self
            .remote
            .query_documents(
                &self.collection,
                &DocumentQuery::new()
                    .equal("userId", user_id)
                    .order_desc("savedAt"),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user_id, "Error getting user saved movies");
                e
            })?;

        documents.iter().map(|doc| doc.decode()).collect()
    }
}
