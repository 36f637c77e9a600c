use serde_json::{Map, Value};
use std::sync::Arc;

use crate::{
    db::DocumentStore,
    error::AppResult,
    models::{Document, DocumentId, DocumentQuery, Movie, Permission, Session, User},
    services::{accounts::AccountProvider, providers::MovieProvider},
};

/// Typed entry point to every remote capability the app consumes
///
/// Holds no business logic. The popularity tracker, saved movies registry and
/// session cache are all built on top of it.
#[derive(Clone)]
pub struct RemoteDataClient {
    movies: Arc<dyn MovieProvider>,
    store: Arc<dyn DocumentStore>,
    accounts: Arc<dyn AccountProvider>,
}

impl RemoteDataClient {
    pub fn new(
        movies: Arc<dyn MovieProvider>,
        store: Arc<dyn DocumentStore>,
        accounts: Arc<dyn AccountProvider>,
    ) -> Self {
        tracing::info!(
            movie_provider = movies.name(),
            document_store = store.name(),
            "Remote data client configured"
        );

        Self {
            movies,
            store,
            accounts,
        }
    }

    pub async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        self.movies.search_movies(query).await
    }

    pub async fn query_documents(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> AppResult<Vec<Document>> {
        self.store.query_documents(collection, query).await
    }

    pub async fn get_document(&self, collection: &str, id: &str) -> AppResult<Document> {
        self.store.get_document(collection, id).await
    }

    pub async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Map<String, Value>,
        permissions: Vec<Permission>,
    ) -> AppResult<Document> {
        self.store
            .create_document(collection, id, fields, permissions)
            .await
    }

    pub async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> AppResult<Document> {
        self.store.update_document(collection, id, fields).await
    }

    pub async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        self.store.delete_document(collection, id).await
    }

    /// Current user, or `None` when signed out or when the lookup failed
    pub async fn get_current_session(&self) -> Option<User> {
        match self.accounts.current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, treating as signed out");
                None
            }
        }
    }

    /// Like `get_current_session`, but keeps lookup failures apart from "signed out"
    pub async fn lookup_current_user(&self) -> AppResult<Option<User>> {
        self.accounts.current_user().await
    }

    /// User owning a session token presented by a gateway caller
    pub async fn user_for_token(&self, token: &str) -> AppResult<Option<User>> {
        self.accounts.user_for_token(token).await
    }

    pub async fn create_session(&self, email: &str, password: &str) -> AppResult<Session> {
        self.accounts.create_session(email, password).await
    }

    /// Creates the account and signs it in
    pub async fn create_account(&self, email: &str, password: &str, name: &str) -> AppResult<User> {
        let user = self.accounts.create_account(email, password, name).await?;
        self.accounts.create_session(email, password).await?;

        tracing::info!(user_id = %user.id, "Account created and signed in");

        Ok(user)
    }

    pub async fn delete_current_session(&self) -> AppResult<()> {
        self.accounts.delete_current_session().await
    }
}
