use std::sync::Arc;

use crate::domain::PollutionRecord;
use crate::ports::{Broadcaster, EventBus};

/// Best-effort fan-out of a persisted record.
///
/// Persist-then-notify is a two-phase contract: by the time this runs the
/// record is already committed, so neither notification path may unwind
/// into the caller or undo the write. Failures are logged and dropped.
pub struct Notifier {
    bus: Arc<dyn EventBus>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl Notifier {
    pub fn new(bus: Arc<dyn EventBus>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { bus, broadcaster }
    }

    /// Announce a freshly persisted record on both channels.
    pub async fn record_collected(&self, record: &PollutionRecord) {
        let update = serde_json::json!({
            "city": record.city,
            "aqi": record.aqi,
            "timestamp": record.timestamp.to_rfc3339(),
        });
        if let Err(e) = self.broadcaster.emit("update", update).await {
            tracing::warn!(city = %record.city, error = %e, "Real-time broadcast failed");
        }

        let event = serde_json::json!({
            "type": "aqi_collected",
            "city": record.city,
            "aqi": record.aqi,
        });
        if let Err(e) = self.bus.publish("aqi_collected", event).await {
            tracing::warn!(city = %record.city, error = %e, "Event publish failed");
        }
    }
}
