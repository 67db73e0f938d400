//! Shared `SQLite` helpers for the repositories.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Open (and create if missing) a database file.
pub(crate) async fn connect(database_path: &str) -> sqlx::Result<SqlitePool> {
    let url = format!("sqlite:{database_path}?mode=rwc");
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
}

/// Open a private in-memory database.
///
/// One connection only, otherwise each connection would see its own empty
/// database.
pub(crate) async fn connect_in_memory() -> sqlx::Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
}

/// Parse an RFC 3339 column, falling back to the epoch for corrupt values.
pub(crate) fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timestamp_roundtrips_rfc3339() {
        let now = Utc::now();
        assert_eq!(parse_timestamp(&now.to_rfc3339()), now);
    }

    #[test]
    fn parse_timestamp_falls_back_to_epoch() {
        assert_eq!(parse_timestamp("yesterday"), DateTime::<Utc>::default());
    }
}
