//! Account deletion with cascading cleanup.
//!
//! Deleting an account must also remove everything the user owns in the
//! other stores. [`AccountDeletion`] runs the account deletion first and,
//! only once it has succeeded, asks each registered collaborator to drop
//! the user's records.

use async_trait::async_trait;
use tracing::{info, warn};

use super::account::AccountService;
use crate::{Error, Result};
use crate::account::{Account, AccountId, AccountStore};

/// A store holding data owned by an account.
#[async_trait]
pub trait AccountDataCleanup: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Remove every record owned by `account_id`, returning how many went.
    async fn delete_all_for_account(&self, account_id: &AccountId) -> Result<u64>;
}

/// Outcome of a completed deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    /// The account that was deleted.
    pub account: Account,
    /// Rows removed per collaborator, in registration order.
    pub removed: Vec<(&'static str, u64)>,
}

impl DeletionReport {
    /// Total dependent records removed.
    #[must_use]
    pub fn total_removed(&self) -> u64 {
        self.removed.iter().map(|(_, count)| count).sum()
    }
}

/// Deletes the signed-in account and everything it owns.
pub struct AccountDeletion<'a, S> {
    service: &'a AccountService<S>,
    collaborators: Vec<&'a dyn AccountDataCleanup>,
}

impl<'a, S: AccountStore> AccountDeletion<'a, S> {
    /// Start a workflow over `service` with no collaborators.
    #[must_use]
    pub const fn new(service: &'a AccountService<S>) -> Self {
        Self {
            service,
            collaborators: Vec::new(),
        }
    }

    /// Register a collaborator whose data is cleaned up after deletion.
    #[must_use]
    pub fn with(mut self, collaborator: &'a dyn AccountDataCleanup) -> Self {
        self.collaborators.push(collaborator);
        self
    }

    /// Run the deletion.
    ///
    /// # Errors
    ///
    /// Any account error aborts before anything is deleted. Once the account
    /// is gone every collaborator still runs; if any of them failed the
    /// result is [`Error::IncompleteDeletion`] naming them, and
    /// [`cleanup`](Self::cleanup) can be retried with the carried id.
    pub async fn run(&self) -> Result<DeletionReport> {
        let account = self.service.current_account().await?;
        self.service.delete_account().await?;

        let removed = self.cleanup(&account.id).await?;

        let report = DeletionReport { account, removed };
        info!(
            "Deleted account {} and {} dependent records",
            report.account.id,
            report.total_removed()
        );
        Ok(report)
    }

    /// Remove everything `account_id` owns from every collaborator.
    ///
    /// Needs no session, so it also serves to finish an interrupted
    /// deletion.
    ///
    /// # Errors
    ///
    /// [`Error::IncompleteDeletion`] if one or more collaborators failed.
    /// The others have still been cleared.
    pub async fn cleanup(&self, account_id: &AccountId) -> Result<Vec<(&'static str, u64)>> {
        let mut removed = Vec::with_capacity(self.collaborators.len());
        let mut failed = Vec::new();

        for collaborator in &self.collaborators {
            match collaborator.delete_all_for_account(account_id).await {
                Ok(count) => removed.push((collaborator.name(), count)),
                Err(e) => {
                    warn!(
                        "Cleanup of {} failed for account {account_id}: {e}",
                        collaborator.name()
                    );
                    failed.push(collaborator.name());
                }
            }
        }

        if failed.is_empty() {
            Ok(removed)
        } else {
            Err(Error::IncompleteDeletion {
                account_id: account_id.clone(),
                failed,
            })
        }
    }
}
