//! Response caching for upstream readings.

mod response_cache;

pub use response_cache::ResponseCache;
