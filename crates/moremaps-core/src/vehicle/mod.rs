//! Vehicles a user travels with.

mod model;
mod repository;

pub use model::{Vehicle, VehicleKind};
pub use repository::VehicleRepository;
