//! Preference data models.

use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// What route planning optimizes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoutePriority {
    /// Least travel time.
    #[default]
    Fastest,
    /// Least distance.
    Shortest,
    /// Least fuel cost.
    Cheapest,
}

impl RoutePriority {
    /// Parse from database string representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "shortest" => Self::Shortest,
            "cheapest" => Self::Cheapest,
            _ => Self::Fastest,
        }
    }

    /// Convert to database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fastest => "fastest",
            Self::Shortest => "shortest",
            Self::Cheapest => "cheapest",
        }
    }
}

/// Base map rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapStyle {
    /// Street map.
    #[default]
    Standard,
    /// Aerial imagery.
    Satellite,
}

impl MapStyle {
    /// Parse from database string representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "satellite" => Self::Satellite,
            _ => Self::Standard,
        }
    }

    /// Convert to database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Satellite => "satellite",
        }
    }
}

/// Per-account settings for route planning and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Owning account.
    pub account_id: AccountId,
    /// Vehicle preselected when planning routes.
    pub default_vehicle_id: Option<String>,
    /// Route optimization goal.
    pub route_priority: RoutePriority,
    /// Base map.
    pub map_style: MapStyle,
}

impl Preferences {
    /// Defaults for an account that never saved preferences.
    #[must_use]
    pub const fn defaults_for(account_id: AccountId) -> Self {
        Self {
            account_id,
            default_vehicle_id: None,
            route_priority: RoutePriority::Fastest,
            map_style: MapStyle::Standard,
        }
    }
}
