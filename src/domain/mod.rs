pub mod base_fee;
pub mod delivery_fee;
pub mod extra_fee;
pub mod repositories;
pub mod weather;

// Re-export commonly used types
pub use base_fee::{BaseFee, BaseFeeRepository};
pub use delivery_fee::{DeliveryFeeRequest, DeliveryFeeResult, FeeBreakdown};
pub use extra_fee::{ConditionType, ExtraFee, ExtraFeeRepository, FeeCondition, ValueRange};
pub use repositories::{DomainResult, RepositoryProvider};
pub use weather::{FeedSnapshot, StationReading, WeatherObservation, WeatherObservationRepository};

pub use crate::shared::errors::DomainError;
