//! Upstream air-quality provider port.

use async_trait::async_trait;

use crate::domain::AirQualityReading;
use crate::error::FetchError;

/// Abstraction over the external air-quality API.
///
/// Implementations own their throttling, caching and retry behavior; the
/// caller sees a single blocking `fetch`.
#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    /// Fetch the current reading for a city.
    async fn fetch(&self, city: &str) -> Result<AirQualityReading, FetchError>;
}
