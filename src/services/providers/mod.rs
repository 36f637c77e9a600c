/// Movie metadata provider abstraction
///
/// Search and the default listing both come from the same provider; TMDB is
/// the only implementation today.
use crate::{error::AppResult, models::Movie};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Search movies by free text
    ///
    /// An empty query is a valid request for the provider's default listing
    /// (popular movies), not an error.
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
