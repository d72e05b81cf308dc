// Authentication service - business logic layer

use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, UserResponse},
    password::PasswordService,
    repository::UserRepository,
    token::{Identity, TokenService},
};
use crate::validation::is_valid_email;

const MIN_PASSWORD_LENGTH: usize = 6;
const MIN_USERNAME_LENGTH: usize = 3;

/// Authentication service coordinating registration and login
pub struct AuthService {
    user_repo: UserRepository,
    token_service: Arc<TokenService>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(user_repo: UserRepository, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// Register a new user
    ///
    /// This method:
    /// 1. Checks the fields locally, failing on the first violation
    /// 2. Rejects a username or email that is already in use
    /// 3. Hashes the password and stores the user
    /// 4. Issues a token for the new identity
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthError> {
        validate_registration(username, email, password)?;

        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = PasswordService::hash_password_blocking(password.to_string()).await?;
        let user = self
            .user_repo
            .create_user(username, email, password_hash)
            .await?;

        let user = UserResponse::from(user);
        let token = self.token_service.issue(&Identity::from(&user))?;

        tracing::info!("Registered user {} ({})", user.username, user.id);
        Ok(AuthResponse { token, user })
    }

    /// Login a user
    ///
    /// An unknown username and a wrong password fail identically.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::CredentialsRequired);
        }

        let Some(user) = self.user_repo.find_by_username(username).await? else {
            // same hashing cost as a password mismatch
            PasswordService::verify_dummy_blocking(password.to_string()).await?;
            tracing::debug!("Login failed: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.user_repo.verify_password(&user, password).await? {
            tracing::debug!("Login failed: password mismatch for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let user = UserResponse::from(user);
        let token = self.token_service.issue(&Identity::from(&user))?;

        tracing::info!("User {} logged in", user.username);
        Ok(AuthResponse { token, user })
    }
}

/// Local registration checks, in order
fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AuthError::FieldsRequired);
    }
    if !is_valid_email(email) {
        return Err(AuthError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(AuthError::UsernameTooShort);
    }
    Ok(())
}
