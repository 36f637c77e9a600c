use parking_lot::RwLock;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::User,
    services::remote::RemoteDataClient,
};

/// Outcome of the last session lookup
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    SignedIn(User),
    SignedOut,
    /// The lookup failed; nothing is known about the session
    Unavailable(String),
}

impl SessionStatus {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionStatus::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

/// Process-wide holder of the current session
///
/// Every screen and card reads the session from here instead of asking the
/// account service on its own. Failed lookups are not cached, so the next
/// read retries.
pub struct SessionCache {
    remote: Arc<RemoteDataClient>,
    status: RwLock<Option<SessionStatus>>,
}

impl SessionCache {
    pub fn new(remote: Arc<RemoteDataClient>) -> Self {
        Self {
            remote,
            status: RwLock::new(None),
        }
    }

    /// Cached status, looking it up on first use or after a failed lookup
    pub async fn status(&self) -> SessionStatus {
        let cached = self.status.read().clone();
        match cached {
            Some(status @ (SessionStatus::SignedIn(_) | SessionStatus::SignedOut)) => status,
            _ => self.refresh().await,
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.status().await.user().cloned()
    }

    /// Asks the account service again and replaces the cached status
    pub async fn refresh(&self) -> SessionStatus {
        let status = match self.remote.lookup_current_user().await {
            Ok(Some(user)) => SessionStatus::SignedIn(user),
            Ok(None) => SessionStatus::SignedOut,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed");
                SessionStatus::Unavailable(e.to_string())
            }
        };

        *self.status.write() = Some(status.clone());
        status
    }

    /// Forgets the cached status; the next read looks it up again
    pub fn invalidate(&self) {
        *self.status.write() = None;
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<User> {
        self.invalidate();
        self.remote.create_session(email, password).await?;
        self.signed_in_user().await
    }

    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> AppResult<User> {
        self.invalidate();
        self.remote.create_account(email, password, name).await?;
        self.signed_in_user().await
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.remote.delete_current_session().await?;
        *self.status.write() = Some(SessionStatus::SignedOut);
        tracing::info!("Signed out");
        Ok(())
    }

    async fn signed_in_user(&self) -> AppResult<User> {
        match self.refresh().await {
            SessionStatus::SignedIn(user) => {
                tracing::info!(user_id = %user.id, "Signed in");
                Ok(user)
            }
            SessionStatus::SignedOut => Err(AppError::Auth(
                "Session was created but no user is signed in".to_string(),
            )),
            SessionStatus::Unavailable(reason) => Err(AppError::Auth(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryDocumentStore,
        models::Session,
        services::{accounts::MockAccountProvider, providers::MockMovieProvider},
    };

    fn cache_with(accounts: MockAccountProvider) -> SessionCache {
        let mut movies = MockMovieProvider::new();
        movies.expect_name().return_const("mock");
        let remote = RemoteDataClient::new(
            Arc::new(movies),
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(accounts),
        );
        SessionCache::new(Arc::new(remote))
    }

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_status_is_looked_up_once() {
        let mut accounts = MockAccountProvider::new();
        accounts
            .expect_current_user()
            .times(1)
            .returning(|| Ok(Some(user())));

        let cache = cache_with(accounts);
        assert_eq!(cache.current_user().await, Some(user()));
        assert_eq!(cache.current_user().await, Some(user()));
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_lookup() {
        let mut accounts = MockAccountProvider::new();
        accounts
            .expect_current_user()
            .times(2)
            .returning(|| Ok(None));

        let cache = cache_with(accounts);
        assert_eq!(cache.status().await, SessionStatus::SignedOut);
        cache.invalidate();
        assert_eq!(cache.status().await, SessionStatus::SignedOut);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_distinguished_and_retried() {
        let mut accounts = MockAccountProvider::new();
        let mut seq = mockall::Sequence::new();
        accounts
            .expect_current_user()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(AppError::Auth("timeout".to_string())));
        accounts
            .expect_current_user()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(Some(user())));

        let cache = cache_with(accounts);
        assert!(matches!(cache.status().await, SessionStatus::Unavailable(_)));
        assert_eq!(cache.status().await, SessionStatus::SignedIn(user()));
    }

    #[tokio::test]
    async fn test_sign_in_refreshes_cached_user() {
        let mut accounts = MockAccountProvider::new();
        accounts.expect_create_session().times(1).returning(|_, _| {
            Ok(Session {
                id: "s1".to_string(),
                user_id: "u1".to_string(),
                expire: None,
            })
        });
        accounts
            .expect_current_user()
            .times(1)
            .returning(|| Ok(Some(user())));

        let cache = cache_with(accounts);
        let signed_in = cache.sign_in("ada@example.com", "hunter22").await.unwrap();

        assert_eq!(signed_in, user());
        assert_eq!(cache.current_user().await, Some(user()));
    }

    #[tokio::test]
    async fn test_sign_in_rejected() {
        let mut accounts = MockAccountProvider::new();
        accounts
            .expect_create_session()
            .returning(|_, _| Err(AppError::Auth("Invalid credentials".to_string())));

        let cache = cache_with(accounts);
        let result = cache.sign_in("ada@example.com", "wrong").await;

        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_sign_out_caches_signed_out() {
        let mut accounts = MockAccountProvider::new();
        accounts
            .expect_delete_current_session()
            .times(1)
            .returning(|| Ok(()));
        accounts.expect_current_user().never();

        let cache = cache_with(accounts);
        cache.sign_out().await.unwrap();

        assert_eq!(cache.status().await, SessionStatus::SignedOut);
    }
}
