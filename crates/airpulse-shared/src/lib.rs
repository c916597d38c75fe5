//! # Airpulse Shared
//!
//! API types shared between the collector server and its clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
