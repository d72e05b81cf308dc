// Credential store adapter over the document store

use chrono::Utc;

use crate::auth::{
    error::AuthError,
    models::{NewUser, User},
    password::PasswordService,
};
use crate::store::{encode, SharedStore, StoreError};

/// Collection holding user documents
pub const USERS_COLLECTION: &str = "users";

/// Fields that must be unique across users
pub const UNIQUE_USER_FIELDS: [&str; 2] = ["username", "email"];

/// User repository for credential lookups and account creation
#[derive(Clone)]
pub struct UserRepository {
    store: SharedStore,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Find a user by exact username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        self.find_by("username", username).await
    }

    /// Find a user by exact email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        self.find_by("email", email).await
    }

    async fn find_by(&self, field: &str, value: &str) -> Result<Option<User>, AuthError> {
        let document = self
            .store
            .find_by_field(USERS_COLLECTION, field, value)
            .await?;

        Ok(document.map(|doc| doc.decode::<User>()).transpose()?)
    }

    /// Create a new user from an already hashed password
    ///
    /// Uniqueness conflicts raised by the store at insert time are reported
    /// as `UsernameTaken` / `EmailTaken`.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: String,
    ) -> Result<User, AuthError> {
        let now = Utc::now();
        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let document = self
            .store
            .create(USERS_COLLECTION, encode(&new_user)?)
            .await
            .map_err(|e| match e {
                StoreError::Conflict { field } if field == "username" => AuthError::UsernameTaken,
                StoreError::Conflict { field } if field == "email" => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        tracing::debug!("Stored user document {}", document.id);
        Ok(document.decode()?)
    }

    /// Check a plaintext password against the user's stored hash
    pub async fn verify_password(&self, user: &User, password: &str) -> Result<bool, AuthError> {
        PasswordService::verify_password_blocking(
            password.to_string(),
            user.password_hash.clone(),
        )
        .await
    }
}
