//! Database entities module

pub mod base_fee;
pub mod extra_fee;
pub mod weather_observation;

pub use base_fee::Entity as BaseFee;
pub use extra_fee::Entity as ExtraFee;
pub use weather_observation::Entity as WeatherObservation;
