//! Error types for the core library.

use thiserror::Error;

use crate::account::AccountId;
use crate::service::AccountError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A record failed validation before it reached the database.
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// Field that was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The account was deleted but some of its data could not be removed.
    #[error(
        "Account {account_id} was deleted but cleanup failed for {}",
        .failed.join(", ")
    )]
    IncompleteDeletion {
        /// The deleted account, for retrying the cleanup.
        account_id: AccountId,
        /// Collaborators that failed.
        failed: Vec<&'static str>,
    },

    /// Account lifecycle operation failed.
    #[error(transparent)]
    Account(#[from] AccountError),
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`].
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
