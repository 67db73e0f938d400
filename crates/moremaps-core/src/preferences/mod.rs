//! Per-account preferences.

mod model;
mod repository;

pub use model::{MapStyle, Preferences, RoutePriority};
pub use repository::PreferenceRepository;
