//! Point-of-interest storage repository.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use super::model::PointOfInterest;
use crate::account::AccountId;
use crate::service::AccountDataCleanup;
use crate::{Result, db};

/// Repository for point-of-interest storage and retrieval.
pub struct PoiRepository {
    pool: SqlitePool,
}

impl PoiRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
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

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS points_of_interest (
                id TEXT PRIMARY KEY NOT NULL,
                account_id TEXT NOT NULL,
                name TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_poi_account ON points_of_interest(account_id)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Save a point (insert or update).
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the database query fails.
    pub async fn save(&self, poi: &PointOfInterest) -> Result<()> {
        poi.validate()?;

        sqlx::query(
            r"
            INSERT INTO points_of_interest
                (id, account_id, name, latitude, longitude, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                description = excluded.description
            ",
        )
        .bind(&poi.id)
        .bind(poi.account_id.as_str())
        .bind(poi.name.trim())
        .bind(poi.latitude)
        .bind(poi.longitude)
        .bind(&poi.description)
        .bind(poi.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a point by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: &str) -> Result<Option<PointOfInterest>> {
        let row = sqlx::query(
            r"
            SELECT id, account_id, name, latitude, longitude, description, created_at
            FROM points_of_interest
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_poi))
    }

    /// List an account's points, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<PointOfInterest>> {
        let rows = sqlx::query(
            r"
            SELECT id, account_id, name, latitude, longitude, description, created_at
            FROM points_of_interest
            WHERE account_id = ?
            ORDER BY created_at ASC
            ",
        )
        .bind(account_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_poi).collect())
    }

    /// Delete a point.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM points_of_interest WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete every point owned by an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn clear_account(&self, account_id: &AccountId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM points_of_interest WHERE account_id = ?")
            .bind(account_id.as_str())
            .execute(&self.pool)
            .await?;

        debug!(
            "Cleared {} points of interest for account {account_id}",
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccountDataCleanup for PoiRepository {
    fn name(&self) -> &'static str {
        "points_of_interest"
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> Result<u64> {
        self.clear_account(account_id).await
    }
}

fn row_to_poi(row: &sqlx::sqlite::SqliteRow) -> PointOfInterest {
    PointOfInterest {
        id: row.get("id"),
        account_id: AccountId::new(row.get::<String, _>("account_id")),
        name: row.get("name"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        description: row.get("description"),
        created_at: db::parse_timestamp(row.get("created_at")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_get() {
        let repo = PoiRepository::in_memory().await.unwrap();
        let poi = PointOfInterest::new(AccountId::new("a1"), "Park Güell", 41.4145, 2.1527)
            .with_description("Gaudí park");

        repo.save(&poi).await.unwrap();

        let loaded = repo.get(&poi.id).await.unwrap().unwrap();
        assert_eq!(loaded, poi);
    }

    #[tokio::test]
    async fn test_save_updates_existing() {
        let repo = PoiRepository::in_memory().await.unwrap();
        let mut poi = PointOfInterest::new(AccountId::new("a1"), "Home", 40.0, -3.0);
        repo.save(&poi).await.unwrap();

        poi.name = "New home".to_string();
        poi.latitude = 40.5;
        repo.save(&poi).await.unwrap();

        let points = repo.list_for_account(&AccountId::new("a1")).await.unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "New home");
        assert_eq!(points[0].latitude, 40.5);
    }

    #[tokio::test]
    async fn test_save_rejects_invalid() {
        let repo = PoiRepository::in_memory().await.unwrap();
        let poi = PointOfInterest::new(AccountId::new("a1"), "Bad", 120.0, 0.0);

        assert!(repo.save(&poi).await.is_err());
        assert!(repo.get(&poi.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = PoiRepository::in_memory().await.unwrap();
        let poi = PointOfInterest::new(AccountId::new("a1"), "Home", 40.0, -3.0);
        repo.save(&poi).await.unwrap();

        repo.delete(&poi.id).await.unwrap();
        assert!(repo.get(&poi.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_account_only_touches_owner() {
        let repo = PoiRepository::in_memory().await.unwrap();
        let mine = AccountId::new("mine");
        let theirs = AccountId::new("theirs");
        repo.save(&PointOfInterest::new(mine.clone(), "A", 1.0, 1.0))
            .await
            .unwrap();
        repo.save(&PointOfInterest::new(mine.clone(), "B", 2.0, 2.0))
            .await
            .unwrap();
        repo.save(&PointOfInterest::new(theirs.clone(), "C", 3.0, 3.0))
            .await
            .unwrap();

        assert_eq!(repo.delete_all_for_account(&mine).await.unwrap(), 2);
        assert!(repo.list_for_account(&mine).await.unwrap().is_empty());
        assert_eq!(repo.list_for_account(&theirs).await.unwrap().len(), 1);
    }
}
