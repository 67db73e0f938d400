//! Settings model.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Duration;
use moremaps_core::{DEFAULT_REAUTH_SECS, StoreConfig};
use serde::{Deserialize, Serialize};

/// Application settings that persist across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Database file. Defaults to `<data dir>/moremaps/moremaps.db`.
    pub database_path: Option<PathBuf>,
    /// Session age in seconds after which deletion asks for a fresh login.
    /// `null` turns the check off.
    pub reauth_after_secs: Option<i64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            reauth_after_secs: Some(DEFAULT_REAUTH_SECS),
        }
    }
}

impl AppSettings {
    /// Database file to open.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("moremaps")
                .join("moremaps.db")
        })
    }

    /// Store policy derived from these settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `reauth_after_secs` is too large for a duration.
    pub fn store_config(&self) -> anyhow::Result<StoreConfig> {
        let reauth_after = match self.reauth_after_secs {
            Some(secs) => Some(
                Duration::try_seconds(secs.max(0))
                    .with_context(|| format!("reauth_after_secs {secs} is out of range"))?,
            ),
            None => None,
        };
        Ok(StoreConfig { reauth_after })
    }
}

/// Default location of the settings file.
#[must_use]
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moremaps")
        .join("settings.json")
}

/// Load application settings from file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub async fn load_settings(path: &Path) -> anyhow::Result<AppSettings> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = AppSettings::default();
        assert!(settings.database_path().ends_with("moremaps/moremaps.db"));
        assert_eq!(settings.store_config().unwrap(), StoreConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{ "database_path": "/tmp/maps.db" }"#).unwrap();
        assert_eq!(settings.database_path(), PathBuf::from("/tmp/maps.db"));
        assert_eq!(settings.reauth_after_secs, Some(DEFAULT_REAUTH_SECS));
    }

    #[test]
    fn null_disables_reauth() {
        let settings: AppSettings =
            serde_json::from_str(r#"{ "reauth_after_secs": null }"#).unwrap();
        assert_eq!(settings.store_config().unwrap().reauth_after, None);
    }

    #[test]
    fn negative_reauth_is_immediate() {
        let settings: AppSettings =
            serde_json::from_str(r#"{ "reauth_after_secs": -5 }"#).unwrap();
        assert_eq!(
            settings.store_config().unwrap().reauth_after,
            Some(Duration::zero())
        );
    }

    #[test]
    fn huge_reauth_is_rejected() {
        let settings: AppSettings =
            serde_json::from_str(r#"{ "reauth_after_secs": 9223372036854775807 }"#).unwrap();
        let err = settings.store_config().unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[tokio::test]
    async fn missing_file_is_default() {
        let settings = load_settings(Path::new("/nonexistent/moremaps/settings.json"))
            .await
            .unwrap();
        assert_eq!(settings, AppSettings::default());
    }
}
