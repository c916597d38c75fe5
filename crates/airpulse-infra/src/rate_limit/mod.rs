//! Rate limiting for outbound API calls.

mod token_bucket;

pub use token_bucket::TokenBucket;
