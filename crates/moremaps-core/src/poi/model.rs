//! Point-of-interest model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::AccountId;
use crate::{Error, Result};

/// A saved place on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Unique identifier.
    pub id: String,
    /// Owning account.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Optional free-text note.
    pub description: Option<String>,
    /// When the point was saved.
    pub created_at: DateTime<Utc>,
}

impl PointOfInterest {
    /// Creates a new point of interest with a fresh id.
    #[must_use]
    pub fn new(account_id: AccountId, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            name: name.into(),
            latitude,
            longitude,
            description: None,
            created_at: Utc::now(),
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check name and coordinate ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("name", "must not be empty"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::invalid(
                "latitude",
                format!("{} is outside [-90, 90]", self.latitude),
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::invalid(
                "longitude",
                format!("{} is outside [-180, 180]", self.longitude),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> AccountId {
        AccountId::new("owner")
    }

    #[test]
    fn valid_point() {
        let poi = PointOfInterest::new(owner(), "Sagrada Família", 41.4036, 2.1744);
        assert!(poi.validate().is_ok());
        assert!(poi.description.is_none());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let poi = PointOfInterest::new(owner(), "Nowhere", 91.0, 0.0);
        assert!(matches!(
            poi.validate(),
            Err(Error::InvalidInput { field: "latitude", .. })
        ));

        let poi = PointOfInterest::new(owner(), "Nowhere", 0.0, -180.5);
        assert!(matches!(
            poi.validate(),
            Err(Error::InvalidInput { field: "longitude", .. })
        ));
    }

    #[test]
    fn rejects_nan() {
        let poi = PointOfInterest::new(owner(), "Nowhere", f64::NAN, 0.0);
        assert!(poi.validate().is_err());
    }

    #[test]
    fn rejects_blank_name() {
        let poi = PointOfInterest::new(owner(), "  ", 0.0, 0.0);
        assert!(matches!(
            poi.validate(),
            Err(Error::InvalidInput { field: "name", .. })
        ));
    }
}
