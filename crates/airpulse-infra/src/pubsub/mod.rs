//! Event bus backends.

mod memory;

pub use memory::{InMemoryEventBus, PubSubEvent};
