//! # moremaps-core
//!
//! Core business logic for `MoreMaps`.
//!
//! This crate provides:
//! - **Account lifecycle** - sign-up, login, logout and deletion through
//!   [`AccountService`] over an injected [`AccountStore`]
//! - `SQLite` and in-memory account stores
//! - Points of interest, vehicles, routes and preferences storage
//! - **Cascading deletion** - [`AccountDeletion`] removes an account and
//!   everything it owns
//!
//! ## Example
//!
//! ```ignore
//! use moremaps_core::{AccountService, MemoryAccountStore, NewAccount};
//!
//! let service = AccountService::new(MemoryAccountStore::new());
//! let account = service
//!     .sign_up(&NewAccount::new("maria@x.com", "María", "Test"), "P4ssword!")
//!     .await?;
//! assert!(service.login("maria@x.com", "P4ssword!").await?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
mod db;
mod error;
pub mod poi;
pub mod preferences;
pub mod route;
pub mod service;
pub mod vehicle;

pub use account::{
    Account, AccountId, AccountStore, DEFAULT_REAUTH_SECS, Gender, MemoryAccountStore,
    NewAccount, SqliteAccountStore, StoreConfig, StoreError, StoreResult, ValidationError,
    is_valid_password, validate_new_account,
};
pub use error::{Error, Result};
pub use poi::{PoiRepository, PointOfInterest};
pub use preferences::{MapStyle, PreferenceRepository, Preferences, RoutePriority};
pub use route::{Route, RouteRepository};
pub use service::{
    AccountDataCleanup, AccountDeletion, AccountError, AccountResult, AccountService,
    DeletionReport,
};
pub use vehicle::{Vehicle, VehicleKind, VehicleRepository};
