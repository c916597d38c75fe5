//! Wire types for the WAQI feed endpoint.
//!
//! The envelope is `{"status": "ok", "data": {...}}` on success and
//! `{"status": "error", "data": "message"}` on failure, so `data` stays a
//! raw value until the status has been inspected.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Top-level feed envelope.
#[derive(Debug, Deserialize)]
pub struct FeedEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: Value,
}

impl FeedEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// The API-supplied message of an error envelope.
    pub fn error_message(&self) -> String {
        match &self.data {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// The `data` object of a successful envelope.
#[derive(Debug, Deserialize)]
pub struct FeedData {
    #[serde(default)]
    pub aqi: Option<f64>,
    #[serde(default)]
    pub iaqi: HashMap<String, IaqiValue>,
    #[serde(default)]
    pub time: Option<FeedTime>,
}

impl FeedData {
    /// A sub-indicator from the `iaqi` map; missing indicators are `None`,
    /// never zero.
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.iaqi.get(name).map(|i| i.v)
    }
}

#[derive(Debug, Deserialize)]
pub struct IaqiValue {
    pub v: f64,
}

#[derive(Debug, Deserialize)]
pub struct FeedTime {
    #[serde(default)]
    pub iso: Option<String>,
}
