use serde_json::{json, Map};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::{
    error::{AppError, AppResult},
    models::{DocumentId, DocumentQuery, Movie, SearchPopularityRecord},
    services::remote::RemoteDataClient,
};

pub const DEFAULT_TRENDING_LIMIT: usize = 5;

/// Counts search hits per term and ranks terms by hit count
///
/// Counting is check-then-act against the store: two first-ever hits for the
/// same term racing each other can both create a record.
pub struct PopularityTracker {
    remote: Arc<RemoteDataClient>,
    collection: String,
}

impl PopularityTracker {
    pub fn new(remote: Arc<RemoteDataClient>, collection: String) -> Self {
        Self { remote, collection }
    }

    /// Records one search for `term` whose first result was `movie`
    ///
    /// Increments the term's counter, or creates it at 1 with a snapshot of
    /// `movie`. A blank term is ignored.
    pub async fn record_search_hit(&self, term: &str, movie: &Movie) -> AppResult<()> {
        if term.trim().is_empty() {
            tracing::debug!("Ignoring search hit for blank term");
            return Ok(());
        }

        let existing = self
            .remote
            .query_documents(
                &self.collection,
                &DocumentQuery::new().equal("searchTerm", term),
            )
            .await?;

        match existing.first() {
            Some(doc) => {
                let record: SearchPopularityRecord = doc.decode()?;
                let mut fields = Map::new();
                fields.insert("count".to_string(), json!(record.count + 1));

                self.remote
                    .update_document(&self.collection, &record.id, fields)
                    .await?;

                tracing::debug!(
                    term = %term,
                    count = record.count + 1,
                    "Search count incremented"
                );
            }
            None => {
                self.remote
                    .create_document(
                        &self.collection,
                        DocumentId::Unique,
                        SearchPopularityRecord::first_hit_fields(term, movie),
                        Vec::new(),
                    )
                    .await?;

                tracing::info!(term = %term, movie_id = movie.id, "Search term recorded");
            }
        }

        Ok(())
    }

    /// Records a hit in the background; failures are logged, never returned
    ///
    /// Callers fire and forget; the handle is only awaited by tests.
    pub fn spawn_search_hit(self: &Arc<Self>, term: String, movie: Movie) -> JoinHandle<()> {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = tracker.record_search_hit(&term, &movie).await {
                tracing::error!(error = %e, term = %term, "Error updating search count");
            }
        })
    }

    /// Most searched terms, highest count first, at most `limit` of them
    ///
    /// Ties keep whatever order the store returns.
    pub async fn get_trending(&self, limit: usize) -> AppResult<Vec<SearchPopularityRecord>> {
        let documents = self
            .remote
            .query_documents(
                &self.collection,
                &DocumentQuery::new().order_desc("count").limit(limit),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to load trending searches");
                e
            })?;

        let mut records = documents
            .iter()
            .map(|doc| doc.decode::<SearchPopularityRecord>())
            .collect::<AppResult<Vec<_>>>()?;

        // Enforce the contract even if a store ignores sort or limit
        records.sort_by(|a, b| b.count.cmp(&a.count));
        records.truncate(limit);

        Ok(records)
    }

    /// Validates a caller-supplied trending limit
    pub fn checked_limit(limit: Option<usize>) -> AppResult<usize> {
        match limit {
            None => Ok(DEFAULT_TRENDING_LIMIT),
            Some(0) => Err(AppError::InvalidInput(
                "limit must be at least 1".to_string(),
            )),
            Some(n) => Ok(n),
        }
    }
}
