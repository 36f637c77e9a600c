use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::User,
    services::{SessionCache, SessionStatus},
};

/// Sign in, sign up and sign out against the shared session
pub struct ProfileScreen {
    session: Arc<SessionCache>,
}

fn require_filled(values: &[&str]) -> AppResult<()> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(AppError::InvalidInput("Please fill in all fields".to_string()));
    }
    Ok(())
}

impl ProfileScreen {
    pub fn new(session: Arc<SessionCache>) -> Self {
        Self { session }
    }

    pub async fn current(&self) -> SessionStatus {
        self.session.status().await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<User> {
        require_filled(&[email, password])?;
        self.session.sign_in(email.trim(), password).await
    }

    /// The display name is optional
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> AppResult<User> {
        require_filled(&[email, password])?;
        self.session.sign_up(email.trim(), password, name.trim()).await
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.session.sign_out().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryDocumentStore,
        models::Session,
        services::{
            accounts::MockAccountProvider, providers::MockMovieProvider, RemoteDataClient,
        },
    };

    fn screen(accounts: MockAccountProvider) -> ProfileScreen {
        let mut movies = MockMovieProvider::new();
        movies.expect_name().return_const("mock");
        let remote = RemoteDataClient::new(
            Arc::new(movies),
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(accounts),
        );
        ProfileScreen::new(Arc::new(SessionCache::new(Arc::new(remote))))
    }

    fn ada() -> User {
        User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn session() -> Session {
        Session {
            id: "s1".to_string(),
            user_id: "u1".to_string(),
            expire: None,
        }
    }

    #[tokio::test]
    async fn test_sign_in_requires_all_fields() {
        let mut accounts = MockAccountProvider::new();
        accounts.expect_create_session().never();

        let result = screen(accounts).sign_in("ada@example.com", "  ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_sign_up_signs_in() {
        let mut accounts = MockAccountProvider::new();
        accounts
            .expect_create_account()
            .withf(|email, _, name| email == "ada@example.com" && name == "Ada")
            .times(1)
            .returning(|_, _, _| Ok(ada()));
        accounts
            .expect_create_session()
            .times(1)
            .returning(|_, _| Ok(session()));
        accounts
            .expect_current_user()
            .returning(|| Ok(Some(ada())));

        let profile = screen(accounts);
        let user = profile
            .sign_up(" ada@example.com ", "hunter22", "Ada")
            .await
            .unwrap();

        assert_eq!(user, ada());
        assert_eq!(profile.current().await, SessionStatus::SignedIn(ada()));
    }

    #[tokio::test]
    async fn test_sign_out_then_signed_out() {
        let mut accounts = MockAccountProvider::new();
        accounts
            .expect_create_session()
            .returning(|_, _| Ok(session()));
        accounts
            .expect_current_user()
            .times(1)
            .returning(|| Ok(Some(ada())));
        accounts
            .expect_delete_current_session()
            .times(1)
            .returning(|| Ok(()));

        let profile = screen(accounts);
        profile.sign_in("ada@example.com", "hunter22").await.unwrap();
        profile.sign_out().await.unwrap();

        assert_eq!(profile.current().await, SessionStatus::SignedOut);
    }
}
