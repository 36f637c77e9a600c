use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};

use reelshelf::{
    db::{DocumentStore, MemoryDocumentStore},
    error::AppResult,
    models::{DocumentQuery, Movie, SearchPopularityRecord},
    screens::{ScreenView, SearchScreen},
    services::{
        LocalAccounts, MovieProvider, PopularityTracker, RemoteDataClient, SavedMoviesRegistry,
    },
};

const SEARCHES: &str = "metrics";

/// Answers every query with "Batman Begins" and remembers what was asked
#[derive(Default)]
struct RecordingProvider {
    queries: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl MovieProvider for RecordingProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        self.queries.lock().push(query.to_string());
        Ok(vec![Movie::new(123, "Batman Begins")])
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct Harness {
    provider: Arc<RecordingProvider>,
    store: Arc<MemoryDocumentStore>,
    remote: Arc<RemoteDataClient>,
    tracker: Arc<PopularityTracker>,
}

fn harness() -> Harness {
    let provider = Arc::new(RecordingProvider::default());
    let store = Arc::new(MemoryDocumentStore::new());
    let remote = Arc::new(RemoteDataClient::new(
        provider.clone(),
        store.clone(),
        Arc::new(LocalAccounts),
    ));
    let tracker = Arc::new(PopularityTracker::new(remote.clone(), SEARCHES.to_string()));
    Harness {
        provider,
        store,
        remote,
        tracker,
    }
}

async fn records(store: &MemoryDocumentStore) -> Vec<SearchPopularityRecord> {
    store
        .query_documents(SEARCHES, &DocumentQuery::new())
        .await
        .unwrap()
        .iter()
        .map(|doc| doc.decode().unwrap())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_repeated_search_increments_same_record() {
    let h = harness();
    let screen = SearchScreen::new(h.remote.clone(), h.tracker.clone(), Duration::from_millis(800));

    screen.set_query("batman");
    tokio::time::sleep(Duration::from_secs(1)).await;

    let first = records(&h.store).await;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].search_term, "batman");
    assert_eq!(first[0].movie_id, 123);
    assert_eq!(first[0].count, 1);

    // Same text again: the change handler fires on every edit, not only on new text
    screen.set_query("batman");
    tokio::time::sleep(Duration::from_secs(1)).await;

    let second = records(&h.store).await;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, first[0].id);
    assert_eq!(second[0].count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_keystrokes_within_debounce_issue_one_search() {
    let h = harness();
    let screen = SearchScreen::new(h.remote.clone(), h.tracker.clone(), Duration::from_millis(800));

    for text in ["b", "ba", "bat"] {
        screen.set_query(text);
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(*h.provider.queries.lock(), vec!["bat".to_string()]);
    assert!(matches!(screen.view(), ScreenView::Ready(found) if found.query == "bat"));
}

#[tokio::test]
async fn test_sequential_hits_count_up() {
    let h = harness();
    let movie = Movie::new(603, "The Matrix");

    for _ in 0..4 {
        h.tracker.record_search_hit("matrix", &movie).await.unwrap();
    }
    h.tracker
        .record_search_hit("alien", &Movie::new(348, "Alien"))
        .await
        .unwrap();

    let trending = h.tracker.get_trending(5).await.unwrap();
    let counts: Vec<(&str, i64)> = trending
        .iter()
        .map(|r| (r.search_term.as_str(), r.count))
        .collect();
    assert_eq!(counts, vec![("matrix", 4), ("alien", 1)]);

    assert_eq!(h.tracker.get_trending(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_list_unsave_roundtrip() {
    let h = harness();
    let registry = SavedMoviesRegistry::new(h.remote.clone(), "saved_movies".to_string());

    let saved = registry.save("u1", &Movie::new(42, "Hitchhiker")).await.unwrap();
    let listed = registry.list_saved_for_user("u1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].movie_id, 42);

    registry.unsave(&saved.id).await.unwrap();
    assert!(registry.list_saved_for_user("u1").await.unwrap().is_empty());

    // Second unsave of the same id is not an error
    assert!(registry.unsave(&saved.id).await.is_ok());
}
