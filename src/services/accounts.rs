use reqwest::{Method, StatusCode};
use serde_json::json;

use crate::{
    db::AppwriteClient,
    error::{AppError, AppResult},
    models::{Session, User},
};

/// Authentication capability: who is signed in, sign in, sign up, sign out
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AccountProvider: Send + Sync {
    /// `Ok(None)` means nobody is signed in; `Err` means the lookup itself failed
    async fn current_user(&self) -> AppResult<Option<User>>;

    async fn create_session(&self, email: &str, password: &str) -> AppResult<Session>;

    /// Resolves a session token (an Appwrite JWT) to its user; `Ok(None)` if it is not valid
    async fn user_for_token(&self, token: &str) -> AppResult<Option<User>>;

    /// Creates an account. Does not sign in.
    async fn create_account(&self, email: &str, password: &str, name: &str) -> AppResult<User>;

    async fn delete_current_session(&self) -> AppResult<()>;
}

fn transport_error(e: reqwest::Error) -> AppError {
    AppError::Auth(format!("Appwrite request failed: {}", e))
}

#[async_trait::async_trait]
impl AccountProvider for AppwriteClient {
    async fn current_user(&self) -> AppResult<Option<User>> {
        let response = self
            .request(Method::GET, "/account")
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            status if status.is_success() => {
                let user: User = response.json().await.map_err(transport_error)?;
                Ok(Some(user))
            }
            StatusCode::UNAUTHORIZED => Ok(None),
            _ => {
                let failure = Self::failure(response).await;
                Err(AppError::Auth(format!(
                    "Account lookup failed with status {}: {}",
                    failure.status, failure.message
                )))
            }
        }
    }

    async fn create_session(&self, email: &str, password: &str) -> AppResult<Session> {
        let response = self
            .request(Method::POST, "/account/sessions/email")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let failure = Self::failure(response).await;
            tracing::warn!(status = %failure.status, "Sign in rejected");
            return Err(AppError::Auth(failure.message));
        }

        response.json().await.map_err(transport_error)
    }

    async fn user_for_token(&self, token: &str) -> AppResult<Option<User>> {
        let response = self
            .request_as_user(Method::GET, "/account", token)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            status if status.is_success() => {
                let user: User = response.json().await.map_err(transport_error)?;
                Ok(Some(user))
            }
            StatusCode::UNAUTHORIZED => Ok(None),
            _ => {
                let failure = Self::failure(response).await;
                Err(AppError::Auth(format!(
                    "Token lookup failed with status {}: {}",
                    failure.status, failure.message
                )))
            }
        }
    }

    async fn create_account(&self, email: &str, password: &str, name: &str) -> AppResult<User> {
        let mut body = json!({
            "userId": "unique()",
            "email": email,
            "password": password,
        });
        if !name.is_empty() {
            body["name"] = json!(name);
        }

        let response = self
            .request(Method::POST, "/account")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let failure = Self::failure(response).await;
            tracing::warn!(status = %failure.status, "Account creation rejected");
            return Err(AppError::Auth(failure.message));
        }

        response.json().await.map_err(transport_error)
    }

    async fn delete_current_session(&self) -> AppResult<()> {
        let response = self
            .request(Method::DELETE, "/account/sessions/current")
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let failure = Self::failure(response).await;
            return Err(AppError::Auth(format!(
                "Sign out failed with status {}: {}",
                failure.status, failure.message
            )));
        }

        Ok(())
    }
}

/// Account backend for local runs without an Appwrite project
///
/// Nobody is ever signed in and every sign-in attempt is refused.
pub struct LocalAccounts;

#[async_trait::async_trait]
impl AccountProvider for LocalAccounts {
    async fn current_user(&self) -> AppResult<Option<User>> {
        Ok(None)
    }

    async fn create_session(&self, _email: &str, _password: &str) -> AppResult<Session> {
        Err(not_configured())
    }

    async fn user_for_token(&self, _token: &str) -> AppResult<Option<User>> {
        Ok(None)
    }

    async fn create_account(&self, _email: &str, _password: &str, _name: &str) -> AppResult<User> {
        Err(not_configured())
    }

    async fn delete_current_session(&self) -> AppResult<()> {
        Ok(())
    }
}

fn not_configured() -> AppError {
    AppError::Auth("Accounts require APPWRITE_PROJECT_ID to be set".to_string())
}
