use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AirQualityReading;

/// Pollution record - one persisted measurement for a city.
///
/// Immutable once written. `(city, timestamp)` identifies a record but no
/// uniqueness is enforced; duplicate timestamps are permitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollutionRecord {
    pub id: Uuid,
    pub city: String,
    pub aqi: Option<f64>,
    pub pm25: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PollutionRecord {
    /// Create a record from a fetched reading with a generated ID.
    pub fn from_reading(city: impl Into<String>, reading: &AirQualityReading) -> Self {
        Self {
            id: Uuid::new_v4(),
            city: city.into(),
            aqi: reading.aqi,
            pm25: reading.pm25,
            co: reading.co,
            no2: reading.no2,
            timestamp: reading.timestamp,
        }
    }
}
