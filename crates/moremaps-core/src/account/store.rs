//! The account store contract.
//!
//! An [`AccountStore`] owns accounts and the single active session. The
//! service layer only reads session state and asks the store to change it.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::model::{Account, NewAccount};
use super::password::PasswordError;

/// Errors reported by an account store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Hashing or verifying a secret failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// The store wants fresh proof of credentials before a destructive call.
    #[error("Recent login required")]
    ReauthRequired,

    /// The operation needs an active session and there is none.
    #[error("No active session")]
    NoSession,

    /// An account with this email already exists.
    #[error("Duplicate account: {0}")]
    Duplicate(String),

    /// No account with this email.
    #[error("Account not found: {0}")]
    NotFound(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable account and session operations.
///
/// Every call may be network or disk bound. Implementations enforce that
/// at most one session is active at a time.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and assign its identifier.
    async fn create_account(&self, account: &NewAccount, secret: &str) -> StoreResult<Account>;

    /// Check an email/secret pair. A mismatch is `Ok(false)`.
    async fn validate_credentials(&self, email: &str, secret: &str) -> StoreResult<bool>;

    /// Whether an account with this email exists.
    async fn exists(&self, email: &str) -> StoreResult<bool>;

    /// Whether a session is currently active.
    async fn session_active(&self) -> StoreResult<bool>;

    /// The account bound to the active session, if any.
    async fn current_account(&self) -> StoreResult<Option<Account>>;

    /// Mark a session active for this account, replacing any other.
    async fn start_session(&self, email: &str) -> StoreResult<()>;

    /// End the active session. Returns `false` if there was none.
    async fn logout_user(&self) -> StoreResult<bool>;

    /// Delete the account bound to the active session along with the session.
    async fn delete_auth_record(&self) -> StoreResult<bool>;
}

#[async_trait]
impl<T: AccountStore + ?Sized> AccountStore for Arc<T> {
    async fn create_account(&self, account: &NewAccount, secret: &str) -> StoreResult<Account> {
        (**self).create_account(account, secret).await
    }

    async fn validate_credentials(&self, email: &str, secret: &str) -> StoreResult<bool> {
        (**self).validate_credentials(email, secret).await
    }

    async fn exists(&self, email: &str) -> StoreResult<bool> {
        (**self).exists(email).await
    }

    async fn session_active(&self) -> StoreResult<bool> {
        (**self).session_active().await
    }

    async fn current_account(&self) -> StoreResult<Option<Account>> {
        (**self).current_account().await
    }

    async fn start_session(&self, email: &str) -> StoreResult<()> {
        (**self).start_session(email).await
    }

    async fn logout_user(&self) -> StoreResult<bool> {
        (**self).logout_user().await
    }

    async fn delete_auth_record(&self) -> StoreResult<bool> {
        (**self).delete_auth_record().await
    }
}

// Allows `Box<dyn AccountStore>` to be injected where a concrete store is expected
#[async_trait]
impl<T: AccountStore + ?Sized> AccountStore for Box<T> {
    async fn create_account(&self, account: &NewAccount, secret: &str) -> StoreResult<Account> {
        (**self).create_account(account, secret).await
    }

    async fn validate_credentials(&self, email: &str, secret: &str) -> StoreResult<bool> {
        (**self).validate_credentials(email, secret).await
    }

    async fn exists(&self, email: &str) -> StoreResult<bool> {
        (**self).exists(email).await
    }

    async fn session_active(&self) -> StoreResult<bool> {
        (**self).session_active().await
    }

    async fn current_account(&self) -> StoreResult<Option<Account>> {
        (**self).current_account().await
    }

    async fn start_session(&self, email: &str) -> StoreResult<()> {
        (**self).start_session(email).await
    }

    async fn logout_user(&self) -> StoreResult<bool> {
        (**self).logout_user().await
    }

    async fn delete_auth_record(&self) -> StoreResult<bool> {
        (**self).delete_auth_record().await
    }
}
