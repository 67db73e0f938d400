//! Core services.
//!
//! This module provides the service layer that sits between callers
//! (forms, the CLI) and the stores.

pub mod account;
pub mod deletion;

pub use account::{AccountError, AccountResult, AccountService};
pub use deletion::{AccountDataCleanup, AccountDeletion, DeletionReport};
