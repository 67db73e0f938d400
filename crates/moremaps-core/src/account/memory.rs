//! In-memory account store.
//!
//! Same contract as the `SQLite` store without persistence. Used as the
//! substitute store in tests and for throwaway runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::model::{Account, AccountId, NewAccount, normalize_email};
use super::password;
use super::store::{AccountStore, StoreError, StoreResult};

struct StoredAccount {
    account: Account,
    password_hash: String,
}

#[derive(Default)]
struct State {
    /// Keyed by normalized email.
    accounts: HashMap<String, StoredAccount>,
    /// Email of the signed-in account.
    session: Option<String>,
}

/// Account store that keeps everything in process memory.
#[derive(Default)]
pub struct MemoryAccountStore {
    state: Mutex<State>,
    require_reauth: AtomicBool,
}

impl MemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make [`AccountStore::delete_auth_record`] demand a fresh login.
    pub fn set_require_reauth(&self, required: bool) {
        self.require_reauth.store(required, Ordering::SeqCst);
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.state.lock().await.accounts.len()
    }

    /// Whether no accounts are stored.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.accounts.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(&self, account: &NewAccount, secret: &str) -> StoreResult<Account> {
        let email = normalize_email(&account.email);
        let password_hash = password::hash_secret_blocking(secret).await?;

        let mut state = self.state.lock().await;
        if state.accounts.contains_key(&email) {
            return Err(StoreError::Duplicate(email));
        }

        let created = Account {
            id: AccountId::generate(),
            email: email.clone(),
            given_name: account.given_name.trim().to_string(),
            family_name: account.family_name.trim().to_string(),
            gender: account.gender_or_default(),
            created_at: Utc::now(),
        };
        state.accounts.insert(
            email,
            StoredAccount {
                account: created.clone(),
                password_hash,
            },
        );

        info!("Created account {}", created.id);
        Ok(created)
    }

    async fn validate_credentials(&self, email: &str, secret: &str) -> StoreResult<bool> {
        let stored_hash = {
            let state = self.state.lock().await;
            state
                .accounts
                .get(&normalize_email(email))
                .map(|stored| stored.password_hash.clone())
        };
        match stored_hash {
            Some(hash) => Ok(password::verify_secret_blocking(secret, hash).await?),
            None => Ok(false),
        }
    }

    async fn exists(&self, email: &str) -> StoreResult<bool> {
        let state = self.state.lock().await;
        Ok(state.accounts.contains_key(&normalize_email(email)))
    }

    async fn session_active(&self) -> StoreResult<bool> {
        Ok(self.state.lock().await.session.is_some())
    }

    async fn current_account(&self) -> StoreResult<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state
            .session
            .as_ref()
            .and_then(|email| state.accounts.get(email))
            .map(|stored| stored.account.clone()))
    }

    async fn start_session(&self, email: &str) -> StoreResult<()> {
        let email = normalize_email(email);
        let mut state = self.state.lock().await;
        if !state.accounts.contains_key(&email) {
            return Err(StoreError::NotFound(email));
        }
        debug!("Session started for {email}");
        state.session = Some(email);
        Ok(())
    }

    async fn logout_user(&self) -> StoreResult<bool> {
        Ok(self.state.lock().await.session.take().is_some())
    }

    async fn delete_auth_record(&self) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let Some(email) = state.session.clone() else {
            return Err(StoreError::NoSession);
        };
        if self.require_reauth.load(Ordering::SeqCst) {
            return Err(StoreError::ReauthRequired);
        }

        state.session = None;
        Ok(state.accounts.remove(&email).is_some())
    }
}
