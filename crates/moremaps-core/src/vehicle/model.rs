//! Vehicle data models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::AccountId;
use crate::{Error, Result};

/// How a vehicle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VehicleKind {
    /// Fuel-powered car.
    #[default]
    Car,
    /// Bicycle.
    Bike,
    /// On foot.
    Walking,
}

impl VehicleKind {
    /// Parse from database string representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bike" => Self::Bike,
            "walking" => Self::Walking,
            _ => Self::Car,
        }
    }

    /// Convert to database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Bike => "bike",
            Self::Walking => "walking",
        }
    }

    /// Whether this kind burns fuel.
    #[must_use]
    pub const fn uses_fuel(&self) -> bool {
        matches!(self, Self::Car)
    }
}

/// A vehicle registered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier.
    pub id: String,
    /// Owning account.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Kind of vehicle.
    pub kind: VehicleKind,
    /// Litres per 100 km, for cars.
    pub consumption: Option<f64>,
}

impl Vehicle {
    /// Creates a new vehicle with a fresh id.
    #[must_use]
    pub fn new(account_id: AccountId, name: impl Into<String>, kind: VehicleKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            name: name.into(),
            kind,
            consumption: None,
        }
    }

    /// Set the fuel consumption.
    #[must_use]
    pub fn with_consumption(mut self, litres_per_100km: f64) -> Self {
        self.consumption = Some(litres_per_100km);
        self
    }

    /// Check the name and consumption.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("name", "must not be empty"));
        }
        if let Some(consumption) = self.consumption {
            if !consumption.is_finite() || consumption < 0.0 {
                return Err(Error::invalid(
                    "consumption",
                    format!("{consumption} is not a non-negative number"),
                ));
            }
            if !self.kind.uses_fuel() {
                return Err(Error::invalid(
                    "consumption",
                    format!("{} does not use fuel", self.kind.as_str()),
                ));
            }
        }
        Ok(())
    }
}
