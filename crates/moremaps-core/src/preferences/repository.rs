//! Preference storage repository.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use super::model::{MapStyle, Preferences, RoutePriority};
use crate::account::AccountId;
use crate::service::AccountDataCleanup;
use crate::{Result, db};

/// Repository for per-account preferences. One row per account.
pub struct PreferenceRepository {
    pool: SqlitePool,
}

impl PreferenceRepository {
    /// Create a new repository with the given database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let repo = Self {
            pool: db::connect(database_path).await?,
        };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let repo = Self {
            pool: db::connect_in_memory().await?,
        };
        repo.initialize().await?;
        Ok(repo)
    }

    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS preferences (
                account_id TEXT PRIMARY KEY NOT NULL,
                default_vehicle_id TEXT,
                route_priority TEXT NOT NULL DEFAULT 'fastest',
                map_style TEXT NOT NULL DEFAULT 'standard',
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get an account's preferences, or the defaults if none were saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, account_id: &AccountId) -> Result<Preferences> {
        let row = sqlx::query(
            r"
            SELECT default_vehicle_id, route_priority, map_style
            FROM preferences
            WHERE account_id = ?
            ",
        )
        .bind(account_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => Preferences {
                account_id: account_id.clone(),
                default_vehicle_id: row.get("default_vehicle_id"),
                route_priority: RoutePriority::parse(row.get("route_priority")),
                map_style: MapStyle::parse(row.get("map_style")),
            },
            None => Preferences::defaults_for(account_id.clone()),
        })
    }

    /// Save preferences (insert or update).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn save(&self, preferences: &Preferences) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO preferences (account_id, default_vehicle_id, route_priority, map_style)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(account_id) DO UPDATE SET
                default_vehicle_id = excluded.default_vehicle_id,
                route_priority = excluded.route_priority,
                map_style = excluded.map_style,
                updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(preferences.account_id.as_str())
        .bind(&preferences.default_vehicle_id)
        .bind(preferences.route_priority.as_str())
        .bind(preferences.map_style.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete an account's preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn clear_account(&self, account_id: &AccountId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM preferences WHERE account_id = ?")
            .bind(account_id.as_str())
            .execute(&self.pool)
            .await?;

        debug!("Cleared preferences for account {account_id}");
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccountDataCleanup for PreferenceRepository {
    fn name(&self) -> &'static str {
        "preferences"
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> Result<u64> {
        self.clear_account(account_id).await
    }
}
