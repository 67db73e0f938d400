//! Points of interest saved by a user.

mod model;
mod repository;

pub use model::PointOfInterest;
pub use repository::PoiRepository;
