//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::{Store, User};
use crate::domain::{Caller, UserId};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, UserInfo};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nom: user.nom.clone(),
            prenom: user.prenom.clone(),
            role: user.role.as_str().to_string(),
            magasin: user.magasin_id.map(|m| m.value()),
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        let is_valid = self.store.verify_user_password(&email, password).await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(LoginResult {
            user: UserInfo::from(&user),
            api_key: user.api_key,
        })
    }

    async fn caller_for_api_key(&self, api_key: &str) -> Result<Option<Caller>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.as_ref().map(User::caller))
    }

    async fn caller_for_user(&self, id: UserId) -> Result<Option<Caller>, AuthError> {
        let user = self.store.get_user(id).await?;
        Ok(user.as_ref().map(User::caller))
    }

    async fn get_user_info(&self, id: UserId) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrator::{DEFAULT_ADMIN_EMAIL, DEFAULT_API_KEY};
    use crate::domain::Role;

    async fn service() -> SeaOrmAuthService {
        SeaOrmAuthService::new(Store::new("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn login_is_case_insensitive_on_email() {
        let auth = service().await;
        let result = auth.login("Admin@Example.com", "password").await.unwrap();
        assert_eq!(result.user.email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(result.api_key, DEFAULT_API_KEY);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = service().await;
        assert!(matches!(
            auth.login(DEFAULT_ADMIN_EMAIL, "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("", "password").await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn api_key_resolves_to_caller() {
        let auth = service().await;
        let caller = auth
            .caller_for_api_key(DEFAULT_API_KEY)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(caller.role, Role::Admin);
        assert!(auth.caller_for_api_key("bogus").await.unwrap().is_none());
    }
}
