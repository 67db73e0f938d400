//! Account management module.
//!
//! Provides the account model, sign-up validation, secret hashing, the
//! [`AccountStore`] contract and its `SQLite` and in-memory implementations.

mod memory;
mod model;
pub mod password;
mod sqlite;
mod store;
mod validation;

pub use memory::MemoryAccountStore;
pub use model::{Account, AccountId, Gender, NewAccount, normalize_email};
pub use password::PasswordError;
pub use sqlite::{DEFAULT_REAUTH_SECS, SqliteAccountStore, StoreConfig};
pub use store::{AccountStore, StoreError, StoreResult};
pub use validation::{
    MIN_PASSWORD_LEN, ValidationError, ValidationResult, is_valid_password, validate_new_account,
};
