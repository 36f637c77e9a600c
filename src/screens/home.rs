use std::sync::Arc;

use crate::{
    models::{Movie, SearchPopularityRecord},
    resource::AsyncResource,
    screens::ScreenView,
    services::{PopularityTracker, RemoteDataClient, SessionCache, SessionStatus},
};

#[derive(Debug, Clone, PartialEq)]
pub struct HomeFeed {
    pub trending: Vec<SearchPopularityRecord>,
    pub latest: Vec<Movie>,
}

/// Landing screen: trending searches plus the default movie listing
pub struct HomeScreen {
    trending: AsyncResource<Vec<SearchPopularityRecord>>,
    latest: AsyncResource<Vec<Movie>>,
    session: Arc<SessionCache>,
}

impl HomeScreen {
    /// Both listings start loading as soon as the screen is created
    ///
    /// The loads are spawned on the current tokio runtime, so this must be
    /// called from within one.
    pub fn new(
        remote: Arc<RemoteDataClient>,
        tracker: Arc<PopularityTracker>,
        session: Arc<SessionCache>,
        trending_limit: usize,
    ) -> Self {
        let trending = AsyncResource::new(
            move || {
                let tracker = tracker.clone();
                async move { tracker.get_trending(trending_limit).await }
            },
            true,
        );

        let latest = AsyncResource::new(
            move || {
                let remote = remote.clone();
                async move { remote.search_movies("").await }
            },
            true,
        );

        Self {
            trending,
            latest,
            session,
        }
    }

    /// Called when the screen comes back into view; re-reads the session so
    /// movie cards reflect sign-ins made elsewhere
    pub async fn focus(&self) -> SessionStatus {
        tracing::debug!("Home screen focused");
        self.session.refresh().await
    }

    pub async fn reload(&self) {
        futures::join!(self.trending.run(), self.latest.run());
    }

    pub fn trending(&self) -> &AsyncResource<Vec<SearchPopularityRecord>> {
        &self.trending
    }

    pub fn latest(&self) -> &AsyncResource<Vec<Movie>> {
        &self.latest
    }

    pub fn view(&self) -> ScreenView<HomeFeed> {
        let trending = self.trending.state();
        let latest = self.latest.state();

        if trending.loading || latest.loading {
            return ScreenView::Loading;
        }
        if let Some(error) = trending.error.or(latest.error) {
            return ScreenView::Failed(error.message);
        }

        ScreenView::Ready(HomeFeed {
            trending: trending.data.unwrap_or_default(),
            latest: latest.data.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryDocumentStore,
        error::AppError,
        models::User,
        services::{accounts::MockAccountProvider, providers::MockMovieProvider},
    };

    async fn settle(screen: &HomeScreen) {
        let mut trending = screen.trending().subscribe();
        let mut latest = screen.latest().subscribe();
        trending.wait_for(|s| !s.loading).await.unwrap();
        latest.wait_for(|s| !s.loading).await.unwrap();
    }

    fn build(movies: MockMovieProvider, accounts: MockAccountProvider) -> (HomeScreen, Arc<PopularityTracker>) {
        let remote = Arc::new(RemoteDataClient::new(
            Arc::new(movies),
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(accounts),
        ));
        let tracker = Arc::new(PopularityTracker::new(remote.clone(), "searches".to_string()));
        let session = Arc::new(SessionCache::new(remote.clone()));
        (HomeScreen::new(remote, tracker.clone(), session, 5), tracker)
    }

    #[tokio::test]
    async fn test_loads_trending_and_latest() {
        let mut movies = MockMovieProvider::new();
        movies.expect_name().return_const("mock");
        movies
            .expect_search_movies()
            .withf(|query| query.is_empty())
            .returning(|_| Ok(vec![Movie::new(1, "Popular")]));

        let (screen, _) = build(movies, MockAccountProvider::new());
        assert_eq!(screen.view(), ScreenView::Loading);

        settle(&screen).await;
        match screen.view() {
            ScreenView::Ready(feed) => {
                assert!(feed.trending.is_empty());
                assert_eq!(feed.latest.len(), 1);
            }
            other => panic!("expected feed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_trending() {
        let mut movies = MockMovieProvider::new();
        movies.expect_name().return_const("mock");
        movies.expect_search_movies().returning(|_| Ok(vec![]));

        let (screen, tracker) = build(movies, MockAccountProvider::new());
        settle(&screen).await;

        tracker
            .record_search_hit("dune", &Movie::new(438631, "Dune"))
            .await
            .unwrap();
        screen.reload().await;

        match screen.view() {
            ScreenView::Ready(feed) => assert_eq!(feed.trending[0].search_term, "dune"),
            other => panic!("expected feed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_latest_failure_is_shown() {
        let mut movies = MockMovieProvider::new();
        movies.expect_name().return_const("mock");
        movies
            .expect_search_movies()
            .returning(|_| Err(AppError::Upstream("Failed to fetch movies".to_string())));

        let (screen, _) = build(movies, MockAccountProvider::new());
        settle(&screen).await;

        assert_eq!(
            screen.view(),
            ScreenView::Failed("Upstream error: Failed to fetch movies".to_string())
        );
    }

    #[tokio::test]
    async fn test_focus_refreshes_session() {
        let mut movies = MockMovieProvider::new();
        movies.expect_name().return_const("mock");
        movies.expect_search_movies().returning(|_| Ok(vec![]));
        let mut accounts = MockAccountProvider::new();
        accounts.expect_current_user().times(2).returning(|| {
            Ok(Some(User {
                id: "u1".to_string(),
                name: String::new(),
                email: String::new(),
            }))
        });

        let (screen, _) = build(movies, accounts);
        assert!(matches!(screen.focus().await, SessionStatus::SignedIn(_)));
        assert!(matches!(screen.focus().await, SessionStatus::SignedIn(_)));
    }
}
