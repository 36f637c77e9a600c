use std::sync::Arc;

use crate::{
    error::AppResult,
    models::SavedMovie,
    resource::AsyncResource,
    screens::ScreenView,
    services::{SavedMoviesRegistry, SessionCache},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SavedList {
    SignedOut,
    Movies(Vec<SavedMovie>),
}

async fn load_saved(
    session: &SessionCache,
    registry: &SavedMoviesRegistry,
) -> AppResult<SavedList> {
    let Some(user) = session.current_user().await else {
        return Ok(SavedList::SignedOut);
    };
    let saved = registry.list_saved_for_user(&user.id).await?;
    tracing::debug!(user_id = %user.id, count = saved.len(), "Loaded saved movies");
    Ok(SavedList::Movies(saved))
}

/// The signed-in user's bookmarks, reloaded every time the screen gains focus
pub struct SavedScreen {
    movies: AsyncResource<SavedList>,
}

impl SavedScreen {
    pub fn new(session: Arc<SessionCache>, registry: Arc<SavedMoviesRegistry>) -> Self {
        let movies = AsyncResource::new(
            move || {
                let session = session.clone();
                let registry = registry.clone();
                async move { load_saved(&session, &registry).await }
            },
            false,
        );

        Self { movies }
    }

    pub async fn focus(&self) {
        self.movies.run().await;
    }

    pub fn movies(&self) -> &AsyncResource<SavedList> {
        &self.movies
    }

    pub fn view(&self) -> ScreenView<Vec<SavedMovie>> {
        let state = self.movies.state();

        if state.loading {
            return ScreenView::Loading;
        }
        if let Some(error) = state.error {
            return ScreenView::Failed(error.message);
        }

        match state.data {
            // Not focused yet
            None => ScreenView::Loading,
            Some(SavedList::SignedOut) => {
                ScreenView::Empty("Please log in to see your saved movies.")
            }
            Some(SavedList::Movies(movies)) if movies.is_empty() => {
                ScreenView::Empty("You haven't saved any movies yet.")
            }
            Some(SavedList::Movies(movies)) => ScreenView::Ready(movies),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{DocumentStore, MemoryDocumentStore, MockDocumentStore},
        error::AppError,
        models::{Movie, User},
        services::{
            accounts::MockAccountProvider, providers::MockMovieProvider, RemoteDataClient,
        },
    };

    fn signed_in_as(id: &'static str) -> MockAccountProvider {
        let mut accounts = MockAccountProvider::new();
        accounts.expect_current_user().returning(move || {
            Ok(Some(User {
                id: id.to_string(),
                name: String::new(),
                email: String::new(),
            }))
        });
        accounts
    }

    fn build(
        accounts: MockAccountProvider,
        store: Arc<dyn DocumentStore>,
    ) -> (SavedScreen, Arc<SavedMoviesRegistry>) {
        let mut movies = MockMovieProvider::new();
        movies.expect_name().return_const("mock");
        let remote = Arc::new(RemoteDataClient::new(Arc::new(movies), store, Arc::new(accounts)));
        let session = Arc::new(SessionCache::new(remote.clone()));
        let registry = Arc::new(SavedMoviesRegistry::new(remote, "saved_movies".to_string()));
        (SavedScreen::new(session, registry.clone()), registry)
    }

    #[tokio::test]
    async fn test_signed_out_prompts_login() {
        let mut accounts = MockAccountProvider::new();
        accounts.expect_current_user().returning(|| Ok(None));
        let (screen, _) = build(accounts, Arc::new(MemoryDocumentStore::new()));

        assert_eq!(screen.view(), ScreenView::Loading);
        screen.focus().await;
        assert_eq!(
            screen.view(),
            ScreenView::Empty("Please log in to see your saved movies.")
        );
    }

    #[tokio::test]
    async fn test_no_bookmarks_message() {
        let (screen, _) = build(signed_in_as("u1"), Arc::new(MemoryDocumentStore::new()));
        screen.focus().await;

        assert_eq!(screen.view(), ScreenView::Empty("You haven't saved any movies yet."));
    }

    #[tokio::test]
    async fn test_focus_reloads_bookmarks() {
        let (screen, registry) = build(signed_in_as("u1"), Arc::new(MemoryDocumentStore::new()));
        screen.focus().await;

        registry.save("u1", &Movie::new(42, "Hitchhiker")).await.unwrap();
        screen.focus().await;

        match screen.view() {
            ScreenView::Ready(movies) => {
                assert_eq!(movies.len(), 1);
                assert_eq!(movies[0].movie_id, 42);
            }
            other => panic!("expected bookmarks, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_shown() {
        let mut store = MockDocumentStore::new();
        store.expect_name().return_const("mock");
        store
            .expect_query_documents()
            .returning(|_, _| Err(AppError::Store("unreachable".to_string())));

        let (screen, _) = build(signed_in_as("u1"), Arc::new(store));
        screen.focus().await;

        match screen.view() {
            ScreenView::Failed(message) => assert!(message.contains("unreachable")),
            other => panic!("expected error, got {:?}", other),
        }
    }
}
