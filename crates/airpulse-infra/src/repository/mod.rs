//! Pollution record stores.

mod memory;

pub use memory::InMemoryPollutionRepository;
