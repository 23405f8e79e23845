//! Domain service for authentication.
//!
//! Turns credentials (password, API key, session) into a [`Caller`].

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Caller, UserId};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub email: String,
    pub nom: String,
    pub prenom: String,
    pub role: String,
    pub magasin: Option<i32>,
}

/// Login result containing user info and API key.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: UserInfo,
    pub api_key: String,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns user info.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Resolves an API key to the caller it belongs to.
    async fn caller_for_api_key(&self, api_key: &str) -> Result<Option<Caller>, AuthError>;

    /// Resolves a session's user id to a caller; `None` if the account is gone.
    async fn caller_for_user(&self, id: UserId) -> Result<Option<Caller>, AuthError>;

    async fn get_user_info(&self, id: UserId) -> Result<UserInfo, AuthError>;
}
