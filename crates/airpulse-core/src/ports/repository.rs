use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::PollutionRecord;
use crate::error::RepoError;

/// Durable store for pollution records.
#[async_trait]
pub trait PollutionRepository: Send + Sync {
    /// The most recent record for a city (timestamp descending, first row).
    async fn latest_for_city(&self, city: &str) -> Result<Option<PollutionRecord>, RepoError>;

    /// Commit one record. A single independent insert - no cross-record
    /// transactions.
    async fn insert(&self, record: PollutionRecord) -> Result<(), RepoError>;

    /// Records for a city since the given instant, timestamp ascending.
    async fn history_for_city(
        &self,
        city: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PollutionRecord>, RepoError>;
}
