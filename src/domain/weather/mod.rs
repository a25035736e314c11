//! Weather aggregate
//!
//! Station observations used to price deliveries, and the raw feed
//! records they are imported from.

pub mod model;
pub mod repository;

pub use model::{FeedSnapshot, StationReading, WeatherObservation};
pub use repository::WeatherObservationRepository;
