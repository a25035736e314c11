//! Weather observation source

mod feed;

pub use feed::{parse_observations, HttpObservationFeed};
