use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decoded air-quality observation for a city, as produced by the
/// upstream provider.
///
/// Missing sub-indicators stay `None` - they are never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub aqi: Option<f64>,
    pub pm25: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    /// Stamped when the fetch completed, not when the station measured.
    pub timestamp: DateTime<Utc>,
}
