//! Event bus port - fire-and-forget structured events.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::EventBusError;

/// Abstraction over the event bus. Publishing requires no acknowledgment.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a structured event to a topic.
    async fn publish(&self, topic: &str, payload: Value) -> Result<(), EventBusError>;
}
