//! Screen orchestrators
//!
//! Each screen composes async resources with the popularity tracker, saved
//! movies registry and session cache, and reduces their state to what a UI
//! renders: a spinner, an error message, an empty-state message or content.

pub mod home;
pub mod movie_card;
pub mod profile;
pub mod saved;
pub mod search;

pub use home::{HomeFeed, HomeScreen};
pub use movie_card::{MovieCard, SaveState, ToggleOutcome};
pub use profile::ProfileScreen;
pub use saved::{SavedList, SavedScreen};
pub use search::{SearchResults, SearchScreen};

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView<T> {
    Loading,
    Failed(String),
    Empty(&'static str),
    Ready(T),
}
