use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};

use crate::domain::PollutionRecord;
use crate::error::CollectError;
use crate::ports::{AirQualityProvider, PollutionRepository};

use super::Notifier;

/// The per-city collection pipeline: staleness gate, fetch, persist,
/// notify, in that order.
///
/// All collaborators are constructor-injected so tests can wire fresh
/// instances; there is no shared global state.
pub struct Collector {
    provider: Arc<dyn AirQualityProvider>,
    repo: Arc<dyn PollutionRepository>,
    notifier: Notifier,
    default_max_age: Duration,
}

impl Collector {
    pub fn new(
        provider: Arc<dyn AirQualityProvider>,
        repo: Arc<dyn PollutionRepository>,
        notifier: Notifier,
        default_max_age: Duration,
    ) -> Self {
        Self {
            provider,
            repo,
            notifier,
            default_max_age,
        }
    }

    /// Collect data for one city.
    ///
    /// `max_age` is the staleness window; `None` uses the configured
    /// default, `Some(Duration::ZERO)` forces an unconditional fetch. When
    /// the latest persisted record is younger than the window the call is a
    /// no-op. Fetch and persistence errors propagate; notification failures
    /// never do.
    pub async fn collect_city(
        &self,
        city: &str,
        max_age: Option<Duration>,
    ) -> Result<(), CollectError> {
        let max_age = max_age.unwrap_or(self.default_max_age);
        if !max_age.is_zero() && self.is_fresh(city, max_age).await? {
            return Ok(());
        }

        let reading = self.provider.fetch(city).await?;
        let record = PollutionRecord::from_reading(city, &reading);
        self.repo.insert(record.clone()).await?;
        tracing::info!(city = %city, aqi = ?record.aqi, "Stored pollution record");

        self.notifier.record_collected(&record).await;
        Ok(())
    }

    /// Collect every city in the list with the default staleness window.
    ///
    /// This is the failure isolation boundary: a per-city error is logged
    /// and the batch moves on.
    pub async fn collect_many(&self, cities: &[String]) {
        self.collect_batch(cities, None).await;
    }

    /// Administrative refresh: collect every city unconditionally.
    pub async fn force_collect_many(&self, cities: &[String]) {
        self.collect_batch(cities, Some(Duration::ZERO)).await;
    }

    async fn collect_batch(&self, cities: &[String], max_age: Option<Duration>) {
        for city in cities {
            if let Err(e) = self.collect_city(city, max_age).await {
                tracing::warn!(city = %city, error = %e, "Failed to collect data");
            }
        }
    }

    /// Whether the latest persisted record is younger than `max_age`.
    /// No record at all means infinitely stale.
    async fn is_fresh(&self, city: &str, max_age: Duration) -> Result<bool, CollectError> {
        let Some(latest) = self.repo.latest_for_city(city).await? else {
            return Ok(false);
        };
        let age = Utc::now().signed_duration_since(latest.timestamp);
        let window = TimeDelta::from_std(max_age).unwrap_or(TimeDelta::MAX);
        if age < window {
            tracing::debug!(
                city = %city,
                age_secs = age.num_seconds(),
                "Latest record still fresh, skipping fetch"
            );
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::Value;

    use crate::domain::AirQualityReading;
    use crate::error::{BroadcastError, EventBusError, FetchError, RepoError};
    use crate::ports::{Broadcaster, EventBus};

    use super::*;

    struct StubProvider {
        aqi: f64,
        fail_for: Option<String>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn returning(aqi: f64) -> Arc<Self> {
            Arc::new(Self {
                aqi,
                fail_for: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing_for(city: &str, aqi: f64) -> Arc<Self> {
            Arc::new(Self {
                aqi,
                fail_for: Some(city.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AirQualityProvider for StubProvider {
        async fn fetch(&self, city: &str) -> Result<AirQualityReading, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_for.as_deref() == Some(city) {
                return Err(FetchError::Api("no data".to_string()));
            }
            Ok(AirQualityReading {
                aqi: Some(self.aqi),
                pm25: Some(10.0),
                co: None,
                no2: None,
                timestamp: Utc::now(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingRepo {
        records: Mutex<Vec<PollutionRecord>>,
    }

    impl RecordingRepo {
        fn with_record(city: &str, timestamp: DateTime<Utc>) -> Arc<Self> {
            let repo = Self::default();
            let reading = AirQualityReading {
                aqi: Some(5.0),
                pm25: None,
                co: None,
                no2: None,
                timestamp,
            };
            repo.records
                .lock()
                .unwrap()
                .push(PollutionRecord::from_reading(city, &reading));
            Arc::new(repo)
        }

        fn count_for(&self, city: &str) -> usize {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.city == city)
                .count()
        }
    }

    #[async_trait]
    impl PollutionRepository for RecordingRepo {
        async fn latest_for_city(&self, city: &str) -> Result<Option<PollutionRecord>, RepoError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.city == city)
                .max_by_key(|r| r.timestamp)
                .cloned())
        }

        async fn insert(&self, record: PollutionRecord) -> Result<(), RepoError> {
            self.records.lock().unwrap().push(record);
            Ok(())
        }

        async fn history_for_city(
            &self,
            city: &str,
            since: DateTime<Utc>,
        ) -> Result<Vec<PollutionRecord>, RepoError> {
            let mut out: Vec<_> = self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.city == city && r.timestamp >= since)
                .cloned()
                .collect();
            out.sort_by_key(|r| r.timestamp);
            Ok(out)
        }
    }

    #[derive(Default)]
    struct RecordingBus {
        events: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl EventBus for RecordingBus {
        async fn publish(&self, topic: &str, payload: Value) -> Result<(), EventBusError> {
            self.events.lock().unwrap().push((topic.to_string(), payload));
            Ok(())
        }
    }

    struct NullBroadcaster;

    #[async_trait]
    impl Broadcaster for NullBroadcaster {
        async fn emit(&self, _event: &str, _payload: Value) -> Result<(), BroadcastError> {
            Ok(())
        }
    }

    struct FailingBroadcaster;

    #[async_trait]
    impl Broadcaster for FailingBroadcaster {
        async fn emit(&self, _event: &str, _payload: Value) -> Result<(), BroadcastError> {
            Err(BroadcastError::Emit("channel closed".to_string()))
        }
    }

    fn collector(
        provider: Arc<StubProvider>,
        repo: Arc<RecordingRepo>,
        bus: Arc<RecordingBus>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Collector {
        Collector::new(
            provider,
            repo,
            Notifier::new(bus, broadcaster),
            Duration::from_secs(30 * 60),
        )
    }

    #[tokio::test]
    async fn empty_store_collects_and_publishes() {
        let provider = StubProvider::returning(42.0);
        let repo = Arc::new(RecordingRepo::default());
        let bus = Arc::new(RecordingBus::default());
        let collector = collector(
            provider.clone(),
            repo.clone(),
            bus.clone(),
            Arc::new(NullBroadcaster),
        );

        collector.collect_city("X", None).await.unwrap();

        assert_eq!(repo.count_for("X"), 1);
        let record = repo.latest_for_city("X").await.unwrap().unwrap();
        assert_eq!(record.aqi, Some(42.0));

        let events = bus.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        let (topic, payload) = &events[0];
        assert_eq!(topic, "aqi_collected");
        assert_eq!(payload["type"], "aqi_collected");
        assert_eq!(payload["city"], "X");
        assert_eq!(payload["aqi"], 42.0);
    }

    #[tokio::test]
    async fn fresh_record_skips_fetch() {
        let provider = StubProvider::returning(42.0);
        let repo = RecordingRepo::with_record("X", Utc::now());
        let bus = Arc::new(RecordingBus::default());
        let collector = collector(
            provider.clone(),
            repo.clone(),
            bus.clone(),
            Arc::new(NullBroadcaster),
        );

        collector.collect_city("X", None).await.unwrap();

        assert_eq!(provider.calls(), 0);
        assert_eq!(repo.count_for("X"), 1);
        assert!(bus.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stale_record_triggers_single_fetch() {
        let provider = StubProvider::returning(7.0);
        let stale = Utc::now() - TimeDelta::hours(2);
        let repo = RecordingRepo::with_record("X", stale);
        let bus = Arc::new(RecordingBus::default());
        let collector = collector(
            provider.clone(),
            repo.clone(),
            bus.clone(),
            Arc::new(NullBroadcaster),
        );

        collector.collect_city("X", None).await.unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(repo.count_for("X"), 2);
    }

    #[tokio::test]
    async fn zero_max_age_forces_fetch() {
        let provider = StubProvider::returning(7.0);
        let repo = RecordingRepo::with_record("X", Utc::now());
        let bus = Arc::new(RecordingBus::default());
        let collector = collector(
            provider.clone(),
            repo.clone(),
            bus.clone(),
            Arc::new(NullBroadcaster),
        );

        collector
            .collect_city("X", Some(Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(repo.count_for("X"), 2);
    }

    #[tokio::test]
    async fn broadcast_failure_leaves_record_persisted() {
        let provider = StubProvider::returning(11.0);
        let repo = Arc::new(RecordingRepo::default());
        let bus = Arc::new(RecordingBus::default());
        let collector = collector(
            provider.clone(),
            repo.clone(),
            bus.clone(),
            Arc::new(FailingBroadcaster),
        );

        collector.collect_city("X", None).await.unwrap();

        assert_eq!(repo.count_for("X"), 1);
        // The bus notification still goes out independently.
        assert_eq!(bus.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn batch_continues_past_failing_city() {
        let provider = StubProvider::failing_for("A", 3.0);
        let repo = Arc::new(RecordingRepo::default());
        let bus = Arc::new(RecordingBus::default());
        let collector = collector(
            provider.clone(),
            repo.clone(),
            bus.clone(),
            Arc::new(NullBroadcaster),
        );

        let cities = vec!["A".to_string(), "B".to_string()];
        collector.collect_many(&cities).await;

        assert_eq!(repo.count_for("A"), 0);
        assert_eq!(repo.count_for("B"), 1);
    }
}
