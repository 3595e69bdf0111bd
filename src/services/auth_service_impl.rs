//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::models::ActionType;
use crate::services::auth_service::{AuthError, AuthService, LoginResult, Registration};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,32}$").expect("valid username regex"));

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

fn validate_registration(input: &Registration) -> Result<(), AuthError> {
    if !USERNAME_RE.is_match(&input.username) {
        return Err(AuthError::Validation(
            "Username must be 3-32 characters of letters, numbers, hyphens, and underscores"
                .to_string(),
        ));
    }

    if !input.email.contains('@') || input.email.len() > 254 {
        return Err(AuthError::Validation("Invalid email address".to_string()));
    }

    if input.password.len() < 8 {
        return Err(AuthError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    Ok(())
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, input: Registration) -> Result<User, AuthError> {
        validate_registration(&input)?;

        let user = self
            .store
            .create_user(
                &input.username,
                &input.email,
                &input.password,
                &self.security,
            )
            .await?
            .ok_or(AuthError::AlreadyRegistered)?;

        // Best-effort trail; registration already succeeded.
        if let Err(e) = self
            .store
            .log_activity(
                user.id,
                ActionType::UserRegistered,
                &serde_json::json!({ "username": user.username }),
            )
            .await
        {
            tracing::warn!("Failed to record registration activity: {e}");
        }

        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        // Verify credentials against database
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        // Get user info for response
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(LoginResult {
            username: user.username,
            api_key: user.api_key,
            level: user.level,
            title: user.title,
        })
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user)
    }

    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        // Validate new password
        if new_password.len() < 8 {
            return Err(AuthError::Validation(
                "New password must be at least 8 characters".to_string(),
            ));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        // Verify current password
        let is_valid = self
            .store
            .verify_user_password(username, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        // Update password
        self.store
            .update_user_password(username, new_password, &self.security)
            .await?;

        Ok(())
    }

    async fn get_api_key(&self, username: &str) -> Result<String, AuthError> {
        let api_key = self
            .store
            .get_user_api_key(username)
            .await?
            .ok_or_else(|| AuthError::Internal("API key not found".to_string()))?;

        Ok(api_key)
    }

    async fn regenerate_api_key(&self, username: &str) -> Result<String, AuthError> {
        let new_api_key = self.store.regenerate_user_api_key(username).await?;

        Ok(new_api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, email: &str, password: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration(&registration("hunter_1", "h@example.com", "hunter2hunter")).is_ok());
        assert!(validate_registration(&registration("ab", "h@example.com", "hunter2hunter")).is_err());
        assert!(validate_registration(&registration("hunter 1", "h@example.com", "hunter2hunter")).is_err());
        assert!(validate_registration(&registration("hunter_1", "not-an-email", "hunter2hunter")).is_err());
        assert!(validate_registration(&registration("hunter_1", "h@example.com", "short")).is_err());
    }
}
