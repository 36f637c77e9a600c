use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};

use crate::{
    models::Movie,
    resource::{AsyncResource, Debouncer},
    screens::ScreenView,
    services::{PopularityTracker, RemoteDataClient},
};

/// Movies found for one query, tagged with the query that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub movies: Vec<Movie>,
}

/// Search-as-you-type screen
///
/// Keystrokes are debounced; only the query that survives the quiet period is
/// sent. A blank query clears the results instead of searching. The first
/// movie of every non-empty result set is recorded as a hit for its query.
pub struct SearchScreen {
    query: Arc<Mutex<String>>,
    results: AsyncResource<SearchResults>,
    tracker: Arc<PopularityTracker>,
    debouncer: Debouncer,
}

impl SearchScreen {
    pub fn new(
        remote: Arc<RemoteDataClient>,
        tracker: Arc<PopularityTracker>,
        debounce: Duration,
    ) -> Self {
        let query = Arc::new(Mutex::new(String::new()));
        let current = query.clone();

        let results = AsyncResource::new(
            move || {
                let remote = remote.clone();
                let query = current.lock().clone();
                async move {
                    remote
                        .search_movies(&query)
                        .await
                        .map(|movies| SearchResults { query, movies })
                }
            },
            false,
        );

        Self {
            query,
            results,
            tracker,
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Handles a change of the search box text
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        *self.query.lock() = text.clone();

        let results = self.results.clone();
        let tracker = self.tracker.clone();
        self.debouncer.schedule(async move {
            if text.trim().is_empty() {
                tracing::debug!("Search query is empty, resetting results");
                results.reset();
                return;
            }

            tracing::debug!(query = %text, "Fetching movies for search");
            if let Some(found) = results.run().await {
                if let Some(first) = found.movies.first() {
                    tracker.spawn_search_hit(found.query.clone(), first.clone());
                }
            }
        });
    }

    pub fn query(&self) -> String {
        self.query.lock().clone()
    }

    pub fn results(&self) -> &AsyncResource<SearchResults> {
        &self.results
    }

    pub fn view(&self) -> ScreenView<SearchResults> {
        let state = self.results.state();

        if state.loading {
            return ScreenView::Loading;
        }
        if let Some(error) = state.error {
            return ScreenView::Failed(error.message);
        }

        match state.data {
            Some(found) if !found.movies.is_empty() => ScreenView::Ready(found),
            _ if self.query().trim().is_empty() => ScreenView::Empty("Search for a movie"),
            _ => ScreenView::Empty("No movies found"),
        }
    }
}
