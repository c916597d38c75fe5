//! In-memory record store - used when no database is configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use airpulse_core::domain::PollutionRecord;
use airpulse_core::error::RepoError;
use airpulse_core::ports::PollutionRepository;

/// Append-only in-memory store.
///
/// Data is lost on process restart; insertion order is preserved and
/// duplicate `(city, timestamp)` pairs are allowed, matching the durable
/// backends.
#[derive(Default)]
pub struct InMemoryPollutionRepository {
    records: RwLock<Vec<PollutionRecord>>,
}

impl InMemoryPollutionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollutionRepository for InMemoryPollutionRepository {
    async fn latest_for_city(&self, city: &str) -> Result<Option<PollutionRecord>, RepoError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.city == city)
            .max_by_key(|r| r.timestamp)
            .cloned())
    }

    async fn insert(&self, record: PollutionRecord) -> Result<(), RepoError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn history_for_city(
        &self,
        city: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PollutionRecord>, RepoError> {
        let records = self.records.read().await;
        let mut out: Vec<_> = records
            .iter()
            .filter(|r| r.city == city && r.timestamp >= since)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.timestamp);
        Ok(out)
    }
}
