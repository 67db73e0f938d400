//! Route storage repository.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use super::model::Route;
use crate::account::AccountId;
use crate::service::AccountDataCleanup;
use crate::{Result, db};

/// Repository for route storage and retrieval.
///
/// Waypoints are stored as a JSON array of point-of-interest ids.
pub struct RouteRepository {
    pool: SqlitePool,
}

impl RouteRepository {
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
            CREATE TABLE IF NOT EXISTS routes (
                id TEXT PRIMARY KEY NOT NULL,
                account_id TEXT NOT NULL,
                name TEXT NOT NULL,
                waypoints TEXT NOT NULL,
                vehicle_id TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_routes_account ON routes(account_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Save a route (insert or update).
    ///
    /// # Errors
    ///
    /// Returns an error if validation, serialization or the database query fails.
    pub async fn save(&self, route: &Route) -> Result<()> {
        route.validate()?;
        let waypoints = serde_json::to_string(&route.waypoints)?;

        sqlx::query(
            r"
            INSERT INTO routes (id, account_id, name, waypoints, vehicle_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                waypoints = excluded.waypoints,
                vehicle_id = excluded.vehicle_id
            ",
        )
        .bind(&route.id)
        .bind(route.account_id.as_str())
        .bind(route.name.trim())
        .bind(&waypoints)
        .bind(&route.vehicle_id)
        .bind(route.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a route by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the stored waypoints are corrupt.
    pub async fn get(&self, id: &str) -> Result<Option<Route>> {
        let row = sqlx::query(
            r"
            SELECT id, account_id, name, waypoints, vehicle_id, created_at
            FROM routes
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_route).transpose()
    }

    /// List an account's routes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or stored waypoints are corrupt.
    pub async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<Route>> {
        let rows = sqlx::query(
            r"
            SELECT id, account_id, name, waypoints, vehicle_id, created_at
            FROM routes
            WHERE account_id = ?
            ORDER BY created_at DESC
            ",
        )
        .bind(account_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_route).collect()
    }

    /// Routes that pass through a point of interest.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or stored waypoints are corrupt.
    pub async fn using_point(&self, account_id: &AccountId, poi_id: &str) -> Result<Vec<Route>> {
        let routes = self.list_for_account(account_id).await?;
        Ok(routes
            .into_iter()
            .filter(|route| route.waypoints.iter().any(|id| id == poi_id))
            .collect())
    }

    /// Delete a route.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM routes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every route owned by an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn clear_account(&self, account_id: &AccountId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM routes WHERE account_id = ?")
            .bind(account_id.as_str())
            .execute(&self.pool)
            .await?;

        debug!(
            "Cleared {} routes for account {account_id}",
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccountDataCleanup for RouteRepository {
    fn name(&self) -> &'static str {
        "routes"
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> Result<u64> {
        self.clear_account(account_id).await
    }
}

fn row_to_route(row: &sqlx::sqlite::SqliteRow) -> Result<Route> {
    let waypoints: &str = row.get("waypoints");
    Ok(Route {
        id: row.get("id"),
        account_id: AccountId::new(row.get::<String, _>("account_id")),
        name: row.get("name"),
        waypoints: serde_json::from_str(waypoints)?,
        vehicle_id: row.get("vehicle_id"),
        created_at: db::parse_timestamp(row.get("created_at")),
    })
}
