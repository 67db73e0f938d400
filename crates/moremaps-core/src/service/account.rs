//! Account lifecycle service.
//!
//! [`AccountService`] is the single entry point for sign-up, login, logout
//! and account deletion. It checks preconditions in a fixed order, then
//! makes at most one mutating store call. It keeps no state of its own;
//! whether someone is signed in is the store's business.
//!
//! Concurrent calls are not serialized here. Two racing logins both reach
//! the store and the last one wins.

use thiserror::Error;
use tracing::{debug, info};

use crate::account::{
    Account, AccountStore, NewAccount, StoreError, ValidationError, is_valid_password,
    normalize_email, validate_new_account,
};

/// Failures surfaced by [`AccountService`].
#[derive(Debug, Error)]
pub enum AccountError {
    /// The secret does not meet the password policy.
    #[error(
        "Password must be at least 8 characters with an uppercase letter, a lowercase letter, a digit and a symbol"
    )]
    WrongPasswordFormat,

    /// Profile fields are missing or malformed.
    #[error("Invalid profile: {}", join_messages(.0))]
    InvalidProfile(Vec<ValidationError>),

    /// Sign-up targets an email that is already registered.
    #[error("An account already exists for {0}")]
    AccountAlreadyExists(String),

    /// No account backs the given email or session.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The operation needs a signed-in user.
    #[error("No active session")]
    SessionNotActive,

    /// The store wants a fresh login before a destructive operation.
    #[error("Please log in again before deleting the account")]
    ReauthRequired,

    /// The store failed for another reason.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ReauthRequired => Self::ReauthRequired,
            StoreError::NoSession => Self::SessionNotActive,
            StoreError::NotFound(email) => Self::AccountNotFound(email),
            other => Self::Store(other),
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::message)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_fields(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::field)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for account lifecycle operations.
pub type AccountResult<T> = std::result::Result<T, AccountError>;

/// Orchestrates the account lifecycle over an injected store.
pub struct AccountService<S> {
    store: S,
}

impl<S: AccountStore> AccountService<S> {
    /// Create a service over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Register a new account.
    ///
    /// Does not sign the new account in.
    ///
    /// # Errors
    ///
    /// - [`AccountError::WrongPasswordFormat`] if `secret` fails the policy.
    /// - [`AccountError::InvalidProfile`] if names or email are invalid.
    /// - [`AccountError::AccountAlreadyExists`] if the email is taken.
    pub async fn sign_up(&self, account: &NewAccount, secret: &str) -> AccountResult<Account> {
        if !is_valid_password(secret) {
            debug!("Sign-up rejected: password format");
            return Err(AccountError::WrongPasswordFormat);
        }
        if let Err(errors) = validate_new_account(account) {
            debug!("Sign-up rejected: invalid {}", join_fields(&errors));
            return Err(AccountError::InvalidProfile(errors));
        }

        let email = normalize_email(&account.email);
        if self.store.exists(&email).await? {
            debug!("Sign-up rejected: {email} already registered");
            return Err(AccountError::AccountAlreadyExists(email));
        }

        let created = match self.store.create_account(account, secret).await {
            Ok(created) => created,
            // Lost a race with another sign-up for the same email
            Err(StoreError::Duplicate(email)) => {
                return Err(AccountError::AccountAlreadyExists(email));
            }
            Err(e) => return Err(e.into()),
        };
        info!("Signed up account {}", created.id);
        Ok(created)
    }

    /// Sign in.
    ///
    /// Returns `Ok(false)` on a wrong secret, leaving session state alone.
    ///
    /// # Errors
    ///
    /// [`AccountError::AccountNotFound`] if no account has this email.
    pub async fn login(&self, email: &str, secret: &str) -> AccountResult<bool> {
        let email = normalize_email(email);
        if !self.store.exists(&email).await? {
            debug!("Login rejected: {email} not registered");
            return Err(AccountError::AccountNotFound(email));
        }

        if !self.store.validate_credentials(&email, secret).await? {
            info!("Login failed for {email}: credentials did not match");
            return Ok(false);
        }

        self.store.start_session(&email).await?;
        info!("Logged in {email}");
        Ok(true)
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// [`AccountError::SessionNotActive`] if nobody is signed in, including
    /// when the session ends between the check and the logout.
    pub async fn logout(&self) -> AccountResult<bool> {
        self.require_session().await?;

        if !self.store.logout_user().await? {
            debug!("Logout found no session to end");
            return Err(AccountError::SessionNotActive);
        }
        info!("Logged out");
        Ok(true)
    }

    /// Delete the signed-in account and end its session.
    ///
    /// Data owned by the account in other stores is not touched here; see
    /// [`AccountDeletion`](super::AccountDeletion) for the cascading workflow.
    ///
    /// # Errors
    ///
    /// - [`AccountError::SessionNotActive`] if nobody is signed in.
    /// - [`AccountError::AccountNotFound`] if the session points at a missing account.
    /// - [`AccountError::ReauthRequired`] if the store wants a fresh login first.
    pub async fn delete_account(&self) -> AccountResult<bool> {
        let account = self.current_account().await?;

        let deleted = self.store.delete_auth_record().await?;
        info!("Deleted account {}", account.id);
        Ok(deleted)
    }

    /// The signed-in account.
    ///
    /// # Errors
    ///
    /// - [`AccountError::SessionNotActive`] if nobody is signed in.
    /// - [`AccountError::AccountNotFound`] if the session points at a missing account.
    pub async fn current_account(&self) -> AccountResult<Account> {
        self.require_session().await?;

        self.store
            .current_account()
            .await?
            .ok_or_else(|| AccountError::AccountNotFound("current session".to_string()))
    }

    async fn require_session(&self) -> AccountResult<()> {
        if self.store.session_active().await? {
            Ok(())
        } else {
            debug!("Rejected: no active session");
            Err(AccountError::SessionNotActive)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::account::{MemoryAccountStore, StoreResult};

    fn maria() -> NewAccount {
        NewAccount::new("maria@x.com", "María", "Test")
    }

    async fn signed_in() -> AccountService<MemoryAccountStore> {
        let service = AccountService::new(MemoryAccountStore::new());
        service.sign_up(&maria(), "P4ssword!").await.unwrap();
        assert!(service.login("maria@x.com", "P4ssword!").await.unwrap());
        service
    }

    /// Records every store call so ordering can be asserted.
    #[derive(Default)]
    struct RecordingStore {
        inner: MemoryAccountStore,
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingStore {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AccountStore for RecordingStore {
        async fn create_account(&self, account: &NewAccount, secret: &str) -> StoreResult<Account> {
            self.record("create_account");
            self.inner.create_account(account, secret).await
        }

        async fn validate_credentials(&self, email: &str, secret: &str) -> StoreResult<bool> {
            self.record("validate_credentials");
            self.inner.validate_credentials(email, secret).await
        }

        async fn exists(&self, email: &str) -> StoreResult<bool> {
            self.record("exists");
            self.inner.exists(email).await
        }

        async fn session_active(&self) -> StoreResult<bool> {
            self.record("session_active");
            self.inner.session_active().await
        }

        async fn current_account(&self) -> StoreResult<Option<Account>> {
            self.record("current_account");
            self.inner.current_account().await
        }

        async fn start_session(&self, email: &str) -> StoreResult<()> {
            self.record("start_session");
            self.inner.start_session(email).await
        }

        async fn logout_user(&self) -> StoreResult<bool> {
            self.record("logout_user");
            self.inner.logout_user().await
        }

        async fn delete_auth_record(&self) -> StoreResult<bool> {
            self.record("delete_auth_record");
            self.inner.delete_auth_record().await
        }
    }

    mod sign_up_tests {
        use super::*;

        #[tokio::test]
        async fn creates_account() {
            let service = AccountService::new(MemoryAccountStore::new());
            let account = service.sign_up(&maria(), "P4ssword!").await.unwrap();

            assert!(!account.id.as_str().is_empty());
            assert_eq!(account.email, "maria@x.com");
            assert_eq!(account.given_name, "María");
            assert_eq!(account.family_name, "Test");
            assert!(service.store().exists("maria@x.com").await.unwrap());
        }

        #[tokio::test]
        async fn does_not_start_session() {
            let service = AccountService::new(MemoryAccountStore::new());
            service.sign_up(&maria(), "P4ssword!").await.unwrap();
            assert!(!service.store().session_active().await.unwrap());
        }

        #[tokio::test]
        async fn rejects_weak_password() {
            let service = AccountService::new(MemoryAccountStore::new());
            let err = service.sign_up(&maria(), "password").await.unwrap_err();

            assert!(matches!(err, AccountError::WrongPasswordFormat));
            assert!(service.store().is_empty().await);
        }

        #[tokio::test]
        async fn password_checked_before_profile() {
            let service = AccountService::new(MemoryAccountStore::new());
            let err = service
                .sign_up(&NewAccount::default(), "password")
                .await
                .unwrap_err();
            assert!(matches!(err, AccountError::WrongPasswordFormat));
        }

        #[tokio::test]
        async fn rejects_empty_names() {
            let service = AccountService::new(MemoryAccountStore::new());
            let err = service
                .sign_up(&NewAccount::new("maria@x.com", "", " "), "P4ssword!")
                .await
                .unwrap_err();

            match err {
                AccountError::InvalidProfile(errors) => {
                    assert_eq!(
                        errors,
                        vec![
                            ValidationError::EmptyGivenName,
                            ValidationError::EmptyFamilyName
                        ]
                    );
                }
                other => panic!("unexpected error: {other}"),
            }
            assert!(service.store().is_empty().await);
        }

        #[tokio::test]
        async fn rejects_duplicate_email() {
            let service = AccountService::new(MemoryAccountStore::new());
            service.sign_up(&maria(), "P4ssword!").await.unwrap();

            let again = NewAccount::new("Maria@X.com", "Maria", "Again");
            let err = service.sign_up(&again, "An0ther!pw").await.unwrap_err();

            assert!(matches!(err, AccountError::AccountAlreadyExists(email) if email == "maria@x.com"));
            assert_eq!(service.store().len().await, 1);
        }

        #[tokio::test]
        async fn failed_precondition_makes_no_store_calls() {
            let service = AccountService::new(RecordingStore::default());
            assert_err!(service.sign_up(&maria(), "short").await);
            assert!(service.store().calls().is_empty());
        }

        #[tokio::test]
        async fn checks_existence_before_create() {
            let service = AccountService::new(RecordingStore::default());
            assert_ok!(service.sign_up(&maria(), "P4ssword!").await);
            assert_eq!(service.store().calls(), vec!["exists", "create_account"]);
        }
    }

    mod login_tests {
        use super::*;

        #[tokio::test]
        async fn unknown_email() {
            let service = AccountService::new(MemoryAccountStore::new());
            let err = service.login("nobody@x.com", "P4ssword!").await.unwrap_err();
            assert!(matches!(err, AccountError::AccountNotFound(_)));
            assert!(!service.store().session_active().await.unwrap());
        }

        #[tokio::test]
        async fn starts_session() {
            let service = signed_in().await;
            assert!(service.store().session_active().await.unwrap());
            assert_eq!(service.current_account().await.unwrap().email, "maria@x.com");
        }

        #[tokio::test]
        async fn wrong_secret_returns_false() {
            let service = AccountService::new(MemoryAccountStore::new());
            service.sign_up(&maria(), "P4ssword!").await.unwrap();

            assert!(!service.login("maria@x.com", "Wr0ng!pass").await.unwrap());
            assert!(!service.store().session_active().await.unwrap());
        }

        #[tokio::test]
        async fn call_order() {
            let service = AccountService::new(RecordingStore::default());
            service.sign_up(&maria(), "P4ssword!").await.unwrap();
            service.store().calls.lock().unwrap().clear();

            assert!(service.login("maria@x.com", "P4ssword!").await.unwrap());
            assert_eq!(
                service.store().calls(),
                vec!["exists", "validate_credentials", "start_session"]
            );
        }
    }

    mod logout_tests {
        use super::*;

        #[tokio::test]
        async fn without_session() {
            let service = AccountService::new(MemoryAccountStore::new());
            assert!(matches!(
                service.logout().await.unwrap_err(),
                AccountError::SessionNotActive
            ));
        }

        #[tokio::test]
        async fn ends_session() {
            let service = signed_in().await;
            assert!(service.logout().await.unwrap());
            assert!(!service.store().session_active().await.unwrap());
        }

        #[tokio::test]
        async fn twice_fails_second_time() {
            let service = signed_in().await;
            assert!(service.logout().await.unwrap());
            assert!(matches!(
                service.logout().await.unwrap_err(),
                AccountError::SessionNotActive
            ));
        }
    }

    mod delete_tests {
        use super::*;

        #[tokio::test]
        async fn without_session() {
            let service = AccountService::new(MemoryAccountStore::new());
            service.sign_up(&maria(), "P4ssword!").await.unwrap();

            assert!(matches!(
                service.delete_account().await.unwrap_err(),
                AccountError::SessionNotActive
            ));
            assert!(service.store().exists("maria@x.com").await.unwrap());
        }

        #[tokio::test]
        async fn removes_account_and_session() {
            let service = signed_in().await;
            assert!(service.delete_account().await.unwrap());

            assert!(!service.store().exists("maria@x.com").await.unwrap());
            assert!(!service.store().session_active().await.unwrap());
        }

        #[tokio::test]
        async fn reauth_required_is_surfaced() {
            let service = signed_in().await;
            service.store().set_require_reauth(true);

            assert!(matches!(
                service.delete_account().await.unwrap_err(),
                AccountError::ReauthRequired
            ));
            assert!(service.store().exists("maria@x.com").await.unwrap());
            assert!(service.store().session_active().await.unwrap());
        }

        #[tokio::test]
        async fn works_through_shared_store() {
            let store = Arc::new(MemoryAccountStore::new());
            let service = AccountService::new(Arc::clone(&store));
            service.sign_up(&maria(), "P4ssword!").await.unwrap();
            service.login("maria@x.com", "P4ssword!").await.unwrap();

            assert!(service.delete_account().await.unwrap());
            assert!(store.is_empty().await);
        }

        #[tokio::test]
        async fn works_through_boxed_store() {
            let store: Box<dyn AccountStore> = Box::new(MemoryAccountStore::new());
            let service = AccountService::new(store);
            service.sign_up(&maria(), "P4ssword!").await.unwrap();
            service.login("maria@x.com", "P4ssword!").await.unwrap();

            assert!(service.delete_account().await.unwrap());
            assert!(!service.store().exists("maria@x.com").await.unwrap());
        }
    }

    mod current_account_tests {
        use super::*;

        #[tokio::test]
        async fn without_session() {
            let service = AccountService::new(MemoryAccountStore::new());
            assert!(matches!(
                service.current_account().await.unwrap_err(),
                AccountError::SessionNotActive
            ));
        }
    }

    #[test]
    fn store_errors_map_to_account_errors() {
        assert!(matches!(
            AccountError::from(StoreError::ReauthRequired),
            AccountError::ReauthRequired
        ));
        assert!(matches!(
            AccountError::from(StoreError::NoSession),
            AccountError::SessionNotActive
        ));
        assert!(matches!(
            AccountError::from(StoreError::NotFound("maria@x.com".to_string())),
            AccountError::AccountNotFound(email) if email == "maria@x.com"
        ));
        assert!(matches!(
            AccountError::from(StoreError::Duplicate("maria@x.com".to_string())),
            AccountError::Store(StoreError::Duplicate(_))
        ));
    }

    /// Store whose session and account disappear between the service's
    /// precondition checks and the mutating call.
    struct VanishingStore;

    #[async_trait]
    impl AccountStore for VanishingStore {
        async fn create_account(&self, account: &NewAccount, _secret: &str) -> StoreResult<Account> {
            Err(StoreError::Duplicate(account.email.clone()))
        }

        async fn validate_credentials(&self, _email: &str, _secret: &str) -> StoreResult<bool> {
            Ok(true)
        }

        async fn exists(&self, _email: &str) -> StoreResult<bool> {
            Ok(true)
        }

        async fn session_active(&self) -> StoreResult<bool> {
            Ok(true)
        }

        async fn current_account(&self) -> StoreResult<Option<Account>> {
            Ok(Some(Account {
                id: crate::account::AccountId::new("gone"),
                email: "maria@x.com".to_string(),
                given_name: "María".to_string(),
                family_name: "Test".to_string(),
                gender: crate::account::Gender::Other,
                created_at: chrono::Utc::now(),
            }))
        }

        async fn start_session(&self, email: &str) -> StoreResult<()> {
            Err(StoreError::NotFound(email.to_string()))
        }

        async fn logout_user(&self) -> StoreResult<bool> {
            Ok(false)
        }

        async fn delete_auth_record(&self) -> StoreResult<bool> {
            Err(StoreError::NoSession)
        }
    }

    #[tokio::test]
    async fn races_stay_inside_account_errors() {
        let service = AccountService::new(VanishingStore);

        assert!(matches!(
            service.login("maria@x.com", "P4ssword!").await.unwrap_err(),
            AccountError::AccountNotFound(email) if email == "maria@x.com"
        ));
        assert!(matches!(
            service.logout().await.unwrap_err(),
            AccountError::SessionNotActive
        ));
        assert!(matches!(
            service.delete_account().await.unwrap_err(),
            AccountError::SessionNotActive
        ));
    }

    #[test]
    fn join_fields_names_rejected_fields() {
        let errors = [ValidationError::EmptyEmail, ValidationError::EmptyFamilyName];
        assert_eq!(join_fields(&errors), "email, family_name");
    }

    #[test]
    fn invalid_profile_message_lists_fields() {
        let err = AccountError::InvalidProfile(vec![
            ValidationError::EmptyGivenName,
            ValidationError::InvalidEmail,
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid profile: Given name is required, Invalid email address format"
        );
    }
}
