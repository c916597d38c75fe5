//! WAQI feed client - the outbound half of the collection pipeline.

mod client;
mod model;

pub use client::{WaqiClient, WaqiConfig};
