//! Route data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::AccountId;
use crate::{Error, Result};

/// A saved route through a user's points of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Unique identifier.
    pub id: String,
    /// Owning account.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Point-of-interest ids in travel order.
    pub waypoints: Vec<String>,
    /// Vehicle used for the route, if chosen.
    pub vehicle_id: Option<String>,
    /// When the route was saved.
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// Creates a new route with a fresh id.
    #[must_use]
    pub fn new(account_id: AccountId, name: impl Into<String>, waypoints: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            name: name.into(),
            waypoints,
            vehicle_id: None,
            created_at: Utc::now(),
        }
    }

    /// Choose the vehicle for this route.
    #[must_use]
    pub fn with_vehicle(mut self, vehicle_id: impl Into<String>) -> Self {
        self.vehicle_id = Some(vehicle_id.into());
        self
    }

    /// Origin waypoint.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.waypoints.first().map(String::as_str)
    }

    /// Destination waypoint.
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        self.waypoints.last().map(String::as_str)
    }

    /// A route needs a name and at least an origin and a destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("name", "must not be empty"));
        }
        if self.waypoints.len() < 2 {
            return Err(Error::invalid(
                "waypoints",
                format!("need at least 2, got {}", self.waypoints.len()),
            ));
        }
        Ok(())
    }
}
