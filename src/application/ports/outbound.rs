//! Outbound ports — interfaces to systems outside the service
//!
//! [`ObservationFeed`] decouples the weather importer from the transport
//! and document format of the station-observation source. The production
//! implementation is
//! [`HttpObservationFeed`](crate::infrastructure::weather::HttpObservationFeed).

use async_trait::async_trait;

use crate::domain::{DomainResult, FeedSnapshot};

/// Source of current weather station readings
#[async_trait]
pub trait ObservationFeed: Send + Sync {
    /// Fetch and parse one snapshot of all stations.
    ///
    /// Transport and document errors surface as `DomainError::Upstream`.
    async fn fetch(&self) -> DomainResult<FeedSnapshot>;
}
