//! In-memory event bus.
//!
//! Works within a single process only; delivery is fire-and-forget and
//! publishing to a topic nobody subscribed to drops the event.

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};

use airpulse_core::error::EventBusError;
use airpulse_core::ports::EventBus;

/// An event delivered to a subscriber.
#[derive(Debug, Clone)]
pub struct PubSubEvent {
    pub topic: String,
    pub payload: String,
}

/// In-memory pub/sub built on tokio broadcast channels, one per topic.
pub struct InMemoryEventBus {
    channels: RwLock<HashMap<String, broadcast::Sender<String>>>,
    buffer_size: usize,
}

impl InMemoryEventBus {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            buffer_size,
        }
    }

    /// Subscribe a handler to a topic. The handler runs on a spawned task
    /// for every event until the topic's channel closes.
    pub async fn subscribe<F, Fut>(&self, topic: &str, handler: F)
    where
        F: Fn(PubSubEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);

        let mut receiver = sender.subscribe();
        let topic = topic.to_string();

        tokio::spawn(async move {
            tracing::info!(topic = %topic, "Subscribed to topic");

            loop {
                match receiver.recv().await {
                    Ok(payload) => {
                        handler(PubSubEvent {
                            topic: topic.clone(),
                            payload,
                        })
                        .await;
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        tracing::warn!(topic = %topic, lagged = count, "Subscriber lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(topic = %topic, "Topic channel closed");
                        break;
                    }
                }
            }
        });
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, topic: &str, payload: Value) -> Result<(), EventBusError> {
        let channels = self.channels.read().await;

        if let Some(sender) = channels.get(topic) {
            // Send errors mean no live subscribers - not a failure.
            let _ = sender.send(payload.to_string());
            tracing::debug!(topic = %topic, "Event published");
        } else {
            tracing::debug!(topic = %topic, "No subscribers for topic");
        }

        Ok(())
    }
}
