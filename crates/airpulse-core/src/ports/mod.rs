//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod broadcast;
mod event_bus;
mod provider;
mod repository;

pub use broadcast::Broadcaster;
pub use event_bus::EventBus;
pub use provider::AirQualityProvider;
pub use repository::PollutionRepository;
