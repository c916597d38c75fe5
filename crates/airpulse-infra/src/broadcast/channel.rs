//! Broadcast-channel implementation of the real-time subscriber feed.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use airpulse_core::error::BroadcastError;
use airpulse_core::ports::Broadcaster;

/// A named event pushed to real-time subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastMessage {
    pub event: String,
    pub payload: Value,
}

/// Fan-out over a tokio broadcast channel.
///
/// Subscribers (the SSE stream handler, tests) attach via [`subscribe`];
/// emitting with no subscribers simply drops the message.
///
/// [`subscribe`]: ChannelBroadcaster::subscribe
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<BroadcastMessage>,
}

impl ChannelBroadcaster {
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastMessage> {
        self.tx.subscribe()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl Broadcaster for ChannelBroadcaster {
    async fn emit(&self, event: &str, payload: Value) -> Result<(), BroadcastError> {
        let _ = self.tx.send(BroadcastMessage {
            event: event.to_string(),
            payload,
        });
        Ok(())
    }
}
