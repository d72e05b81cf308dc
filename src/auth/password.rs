// Password hashing and verification service

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::OnceLock;

use crate::auth::error::AuthError;

/// Plaintext behind the stand-in hash; no stored account can have it as a hash
const DUMMY_PASSWORD: &str = "no-such-user-placeholder";

/// Password service for hashing and verification
///
/// Argon2id with the crate defaults (19 MiB, 2 passes), which costs tens of
/// milliseconds per call. Both operations are CPU-bound; async callers run
/// them on the blocking pool.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a fresh random salt
    ///
    /// Returns a PHC string (algorithm, parameters, salt and digest).
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Verify a password against a stored hash
    ///
    /// A malformed hash never verifies.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a valid PHC string");
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Argon2 hash with the same parameters as real ones, built on first use
    ///
    /// Verified against when no user matches a login, so both failure paths
    /// cost one Argon2 verification.
    pub fn dummy_hash() -> &'static str {
        static DUMMY_HASH: OnceLock<String> = OnceLock::new();
        DUMMY_HASH.get_or_init(|| {
            Self::hash_password(DUMMY_PASSWORD).unwrap_or_else(|e| {
                tracing::error!("Failed to build dummy password hash: {}", e);
                String::new()
            })
        })
    }

    /// `hash_password` on the blocking pool
    pub async fn hash_password_blocking(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {}", e)))?
    }

    /// `verify_password` on the blocking pool
    pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {}", e)))
    }

    /// Verify against `dummy_hash` on the blocking pool; the result is discarded
    pub async fn verify_dummy_blocking(password: String) -> Result<(), AuthError> {
        tokio::task::spawn_blocking(move || {
            Self::verify_password(&password, Self::dummy_hash());
        })
        .await
        .map_err(|e| AuthError::Internal(format!("verification task failed: {}", e)))
    }
}
