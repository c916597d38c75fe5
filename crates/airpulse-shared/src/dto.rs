//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// A stored pollution record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollutionRecordDto {
    pub city: String,
    pub aqi: Option<f64>,
    pub pm25: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

/// Query parameters for the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Window in hours, defaults to 24.
    pub hours: Option<i64>,
}

/// Response to a batch collection trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectResponse {
    pub cities: Vec<String>,
}
