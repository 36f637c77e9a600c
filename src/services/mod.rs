pub mod accounts;
pub mod popularity;
pub mod providers;
pub mod remote;
pub mod saved_movies;
pub mod session;

pub use accounts::{AccountProvider, LocalAccounts};
pub use popularity::PopularityTracker;
pub use providers::{MovieProvider, TmdbProvider};
pub use remote::RemoteDataClient;
pub use saved_movies::SavedMoviesRegistry;
pub use session::{SessionCache, SessionStatus};
