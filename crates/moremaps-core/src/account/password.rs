//! Secret hashing.
//!
//! Stores never keep plain secrets. Each secret is hashed with Argon2id and
//! a random salt; the PHC string is what gets persisted.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::rngs::OsRng;
use tracing::debug;

/// Error type for hashing operations.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing or parsing a stored hash failed.
    #[error("Password hash error: {0}")]
    Hash(String),

    /// The blocking hashing task did not complete.
    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<argon2::password_hash::Error> for PasswordError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Hash(err.to_string())
    }
}

/// Hash a secret for storage.
///
/// # Errors
///
/// Returns an error if Argon2 rejects the input.
pub fn hash_secret(secret: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Check a secret against a stored hash.
///
/// A mismatch is `Ok(false)`; only a corrupt stored hash is an error.
///
/// # Errors
///
/// Returns an error if the stored hash cannot be parsed.
pub fn verify_secret(secret: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => {
            debug!("Secret did not match stored hash");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// [`hash_secret`] on the blocking thread pool.
///
/// # Errors
///
/// Returns an error if Argon2 rejects the input or the task is cancelled.
pub async fn hash_secret_blocking(secret: &str) -> Result<String, PasswordError> {
    let secret = secret.to_owned();
    tokio::task::spawn_blocking(move || hash_secret(&secret)).await?
}

/// [`verify_secret`] on the blocking thread pool.
///
/// # Errors
///
/// Returns an error if the stored hash cannot be parsed or the task is cancelled.
pub async fn verify_secret_blocking(
    secret: &str,
    stored_hash: String,
) -> Result<bool, PasswordError> {
    let secret = secret.to_owned();
    tokio::task::spawn_blocking(move || verify_secret(&secret, &stored_hash)).await?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_secret("P4ssword!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_secret("P4ssword!", &hash).unwrap());
        assert!(!verify_secret("p4ssword!", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_secret("P4ssword!").unwrap();
        let b = hash_secret("P4ssword!").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn blocking_helpers_agree() {
        let hash = hash_secret_blocking("P4ssword!").await.unwrap();
        assert!(verify_secret_blocking("P4ssword!", hash.clone()).await.unwrap());
        assert!(!verify_secret_blocking("p4ssword!", hash).await.unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_error() {
        assert!(verify_secret("P4ssword!", "not-a-hash").is_err());
    }
}
