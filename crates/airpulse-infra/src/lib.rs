//! # Airpulse Infrastructure
//!
//! Concrete implementations of the ports defined in `airpulse-core`:
//! the WAQI HTTP client with its token bucket and response cache, the
//! pollution record stores, and the in-process notification backends.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL persistence via SeaORM

pub mod broadcast;
pub mod cache;
pub mod database;
pub mod pubsub;
pub mod rate_limit;
pub mod repository;
pub mod waqi;

pub use broadcast::{BroadcastMessage, ChannelBroadcaster};
pub use cache::ResponseCache;
pub use pubsub::InMemoryEventBus;
pub use rate_limit::TokenBucket;
pub use repository::InMemoryPollutionRepository;
pub use waqi::{WaqiClient, WaqiConfig};

#[cfg(feature = "postgres")]
pub use database::PostgresPollutionRepository;
