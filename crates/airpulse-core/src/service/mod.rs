//! Services - the collection pipeline built on top of the ports.

mod collector;
mod notifier;

pub use collector::Collector;
pub use notifier::Notifier;
