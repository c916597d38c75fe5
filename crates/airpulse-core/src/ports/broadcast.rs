//! Real-time broadcaster port.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BroadcastError;

/// Abstraction over the real-time subscriber channel. Fire-and-forget.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Emit a named event to all current subscribers.
    async fn emit(&self, event: &str, payload: Value) -> Result<(), BroadcastError>;
}
