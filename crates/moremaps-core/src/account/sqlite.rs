//! `SQLite`-backed account store.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::Row;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

use super::model::{Account, AccountId, Gender, NewAccount, normalize_email};
use super::password;
use super::store::{AccountStore, StoreError, StoreResult};
use crate::{Result, db};

/// Default session age after which deletion asks for a fresh login.
pub const DEFAULT_REAUTH_SECS: i64 = 300;

/// Store policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum session age for destructive operations. `None` disables the check.
    pub reauth_after: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            reauth_after: Some(Duration::seconds(DEFAULT_REAUTH_SECS)),
        }
    }
}

impl StoreConfig {
    /// Whether a session authenticated at `authenticated_at` is too old.
    #[must_use]
    pub fn requires_reauth(&self, authenticated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.reauth_after
            .is_some_and(|max_age| now - authenticated_at >= max_age)
    }
}

/// Account store persisted in `SQLite`.
///
/// The session lives in a single-row table, so a login survives restarts.
pub struct SqliteAccountStore {
    pool: SqlitePool,
    config: StoreConfig,
}

impl SqliteAccountStore {
    /// Create a new store with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let store = Self {
            pool: db::connect(database_path).await?,
            config: StoreConfig::default(),
        };
        store.initialize().await?;
        Ok(store)
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let store = Self {
            pool: db::connect_in_memory().await?,
            config: StoreConfig::default(),
        };
        store.initialize().await?;
        Ok(store)
    }

    /// Replace the store policy.
    #[must_use]
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY NOT NULL,
                email TEXT NOT NULL UNIQUE,
                given_name TEXT NOT NULL,
                family_name TEXT NOT NULL,
                gender TEXT NOT NULL DEFAULT 'OTHER',
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // At most one session: the primary key is pinned to 1
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS session (
                slot INTEGER PRIMARY KEY CHECK (slot = 1),
                account_id TEXT NOT NULL,
                authenticated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn create_account(&self, account: &NewAccount, secret: &str) -> StoreResult<Account> {
        let email = normalize_email(&account.email);
        let password_hash = password::hash_secret_blocking(secret).await?;
        let created = Account {
            id: AccountId::generate(),
            email,
            given_name: account.given_name.trim().to_string(),
            family_name: account.family_name.trim().to_string(),
            gender: account.gender_or_default(),
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            r"
            INSERT INTO accounts (
                id, email, given_name, family_name, gender, password_hash, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(created.id.as_str())
        .bind(&created.email)
        .bind(&created.given_name)
        .bind(&created.family_name)
        .bind(created.gender.as_str())
        .bind(&password_hash)
        .bind(created.created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                info!("Created account {}", created.id);
                Ok(created)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate(created.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn validate_credentials(&self, email: &str, secret: &str) -> StoreResult<bool> {
        let row = sqlx::query("SELECT password_hash FROM accounts WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                Ok(password::verify_secret_blocking(secret, row.get("password_hash")).await?)
            }
            None => Ok(false),
        }
    }

    async fn exists(&self, email: &str) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 FROM accounts WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn session_active(&self) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 FROM session WHERE slot = 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn current_account(&self) -> StoreResult<Option<Account>> {
        let row = sqlx::query(
            r"
            SELECT a.id, a.email, a.given_name, a.family_name, a.gender, a.created_at
            FROM session s
            JOIN accounts a ON a.id = s.account_id
            WHERE s.slot = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_account))
    }

    async fn start_session(&self, email: &str) -> StoreResult<()> {
        let email = normalize_email(email);
        let row = sqlx::query("SELECT id FROM accounts WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Err(StoreError::NotFound(email));
        };
        let account_id: String = row.get("id");

        sqlx::query(
            r"
            INSERT INTO session (slot, account_id, authenticated_at)
            VALUES (1, ?, ?)
            ON CONFLICT(slot) DO UPDATE SET
                account_id = excluded.account_id,
                authenticated_at = excluded.authenticated_at
            ",
        )
        .bind(&account_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("Session started for account {account_id}");
        Ok(())
    }

    async fn logout_user(&self) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM session")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_auth_record(&self) -> StoreResult<bool> {
        let row = sqlx::query("SELECT account_id, authenticated_at FROM session WHERE slot = 1")
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Err(StoreError::NoSession);
        };

        let account_id: String = row.get("account_id");
        let authenticated_at = db::parse_timestamp(row.get("authenticated_at"));
        if self.config.requires_reauth(authenticated_at, Utc::now()) {
            debug!("Session for account {account_id} is too old for deletion");
            return Err(StoreError::ReauthRequired);
        }

        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(&account_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM session")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Deleted account {account_id}");
        Ok(deleted > 0)
    }
}

/// Convert a database row to an Account.
fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Account {
    Account {
        id: AccountId::new(row.get::<String, _>("id")),
        email: row.get("email"),
        given_name: row.get("given_name"),
        family_name: row.get("family_name"),
        gender: Gender::parse(row.get("gender")),
        created_at: db::parse_timestamp(row.get("created_at")),
    }
}
