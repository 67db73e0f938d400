//! Routes between points of interest.

mod model;
mod repository;

pub use model::Route;
pub use repository::RouteRepository;
