//! Vehicle storage repository.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use super::model::{Vehicle, VehicleKind};
use crate::account::AccountId;
use crate::service::AccountDataCleanup;
use crate::{Result, db};

/// Repository for vehicle storage and retrieval.
pub struct VehicleRepository {
    pool: SqlitePool,
}

impl VehicleRepository {
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
            CREATE TABLE IF NOT EXISTS vehicles (
                id TEXT PRIMARY KEY NOT NULL,
                account_id TEXT NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                consumption REAL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_vehicles_account ON vehicles(account_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Save a vehicle (insert or update).
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the database query fails.
    pub async fn save(&self, vehicle: &Vehicle) -> Result<()> {
        vehicle.validate()?;

        sqlx::query(
            r"
            INSERT INTO vehicles (id, account_id, name, kind, consumption)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                kind = excluded.kind,
                consumption = excluded.consumption
            ",
        )
        .bind(&vehicle.id)
        .bind(vehicle.account_id.as_str())
        .bind(vehicle.name.trim())
        .bind(vehicle.kind.as_str())
        .bind(vehicle.consumption)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a vehicle by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: &str) -> Result<Option<Vehicle>> {
        let row = sqlx::query(
            "SELECT id, account_id, name, kind, consumption FROM vehicles WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_vehicle))
    }

    /// List an account's vehicles by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<Vehicle>> {
        let rows = sqlx::query(
            r"
            SELECT id, account_id, name, kind, consumption
            FROM vehicles
            WHERE account_id = ?
            ORDER BY name COLLATE NOCASE ASC
            ",
        )
        .bind(account_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_vehicle).collect())
    }

    /// Delete a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM vehicles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every vehicle owned by an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn clear_account(&self, account_id: &AccountId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM vehicles WHERE account_id = ?")
            .bind(account_id.as_str())
            .execute(&self.pool)
            .await?;

        debug!(
            "Cleared {} vehicles for account {account_id}",
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccountDataCleanup for VehicleRepository {
    fn name(&self) -> &'static str {
        "vehicles"
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> Result<u64> {
        self.clear_account(account_id).await
    }
}

fn row_to_vehicle(row: &sqlx::sqlite::SqliteRow) -> Vehicle {
    Vehicle {
        id: row.get("id"),
        account_id: AccountId::new(row.get::<String, _>("account_id")),
        name: row.get("name"),
        kind: VehicleKind::parse(row.get("kind")),
        consumption: row.get("consumption"),
    }
}
