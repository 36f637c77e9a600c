use parking_lot::Mutex;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    error::AppResult,
    models::Movie,
    services::{SavedMoviesRegistry, SessionCache},
};

/// Bookmark state of one card as last observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    Unknown,
    Checking,
    Saved { document_id: String },
    NotSaved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Saved { document_id: String },
    Unsaved,
    /// Nobody is signed in; the caller should send the user to the profile screen
    SignInRequired,
    /// A check or previous toggle is still running; nothing was done
    Busy,
}

/// A movie tile with a save/unsave toggle
///
/// At most one request (the saved-status check, a save or an unsave) is in
/// flight per card. A failed save or unsave leaves the bookmark state as it was.
pub struct MovieCard {
    movie: Movie,
    session: Arc<SessionCache>,
    registry: Arc<SavedMoviesRegistry>,
    state: Mutex<SaveState>,
    busy: AtomicBool,
}

/// Clears the busy flag when a check or toggle finishes, however it finishes
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl MovieCard {
    pub fn new(movie: Movie, session: Arc<SessionCache>, registry: Arc<SavedMoviesRegistry>) -> Self {
        Self {
            movie,
            session,
            registry,
            state: Mutex::new(SaveState::Unknown),
            busy: AtomicBool::new(false),
        }
    }

    pub fn movie(&self) -> &Movie {
        &self.movie
    }

    pub fn save_state(&self) -> SaveState {
        self.state.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Takes the busy flag, or `None` if a check or toggle is already running
    fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(&self.busy))
    }

    async fn lookup(&self, user_id: &str) -> AppResult<SaveState> {
        Ok(match self.registry.is_saved(user_id, self.movie.id).await? {
            Some(document_id) => SaveState::Saved { document_id },
            None => SaveState::NotSaved,
        })
    }

    /// Looks up whether the signed-in user has bookmarked this movie
    ///
    /// Signed out or a failed lookup both show as not saved. While a check or
    /// toggle is in flight this returns the current state without a lookup.
    pub async fn check(&self) -> SaveState {
        let Some(_guard) = self.try_begin() else {
            return self.save_state();
        };
        *self.state.lock() = SaveState::Checking;

        let next = match self.session.current_user().await {
            None => SaveState::NotSaved,
            Some(user) => self.lookup(&user.id).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, movie_id = self.movie.id, "Could not check saved status");
                SaveState::NotSaved
            }),
        };

        *self.state.lock() = next.clone();
        next
    }

    /// Saves the movie, or removes the bookmark if it is currently saved
    ///
    /// Ignored while a check or another toggle is in flight. A card that was
    /// never checked is checked first, so an existing bookmark is removed
    /// rather than duplicated.
    pub async fn toggle(&self) -> AppResult<ToggleOutcome> {
        let Some(_guard) = self.try_begin() else {
            tracing::debug!(movie_id = self.movie.id, "Toggle ignored while busy");
            return Ok(ToggleOutcome::Busy);
        };

        let Some(user) = self.session.current_user().await else {
            return Ok(ToggleOutcome::SignInRequired);
        };

        let current = match self.save_state() {
            SaveState::Unknown | SaveState::Checking => {
                let found = self.lookup(&user.id).await?;
                *self.state.lock() = found.clone();
                found
            }
            known => known,
        };

        match current {
            SaveState::Saved { document_id } => {
                self.registry.unsave(&document_id).await?;
                *self.state.lock() = SaveState::NotSaved;
                Ok(ToggleOutcome::Unsaved)
            }
            _ => {
                let saved = self.registry.save(&user.id, &self.movie).await?;
                *self.state.lock() = SaveState::Saved {
                    document_id: saved.id.clone(),
                };
                Ok(ToggleOutcome::Saved {
                    document_id: saved.id,
                })
            }
        }
    }
}
