//! Bounded TTL cache for recent readings, keyed by city name.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use airpulse_core::domain::AirQualityReading;

struct CacheEntry {
    reading: AirQualityReading,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// TTL response cache.
///
/// Entries expire a fixed duration after insertion and are removed lazily
/// on lookup. The cache is capacity-bounded: on overflow an expired entry
/// is evicted first, otherwise the oldest-inserted one. A `put` for an
/// already-cached city replaces in place and never counts against
/// capacity. Allow-list gating is the caller's concern - this is a plain
/// TTL map.
pub struct ResponseCache {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A live cached reading for the city, if any.
    pub async fn get(&self, city: &str) -> Option<AirQualityReading> {
        let entries = self.entries.read().await;
        let entry = entries.get(city)?;

        if entry.is_expired(self.ttl) {
            drop(entries);
            // Clean up under the write lock; re-check since another task
            // may have refreshed the entry in between.
            let mut entries = self.entries.write().await;
            if entries.get(city).is_some_and(|e| e.is_expired(self.ttl)) {
                entries.remove(city);
            }
            return None;
        }

        Some(entry.reading.clone())
    }

    pub async fn put(&self, city: &str, reading: AirQualityReading) {
        let mut entries = self.entries.write().await;

        if !entries.contains_key(city) && entries.len() >= self.capacity {
            let victim = entries
                .iter()
                .find(|(_, e)| e.is_expired(self.ttl))
                .or_else(|| entries.iter().min_by_key(|(_, e)| e.inserted_at))
                .map(|(k, _)| k.clone());
            if let Some(victim) = victim {
                entries.remove(&victim);
            }
        }

        entries.insert(
            city.to_string(),
            CacheEntry {
                reading,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::time;

    use super::*;

    fn reading(aqi: f64) -> AirQualityReading {
        AirQualityReading {
            aqi: Some(aqi),
            pm25: None,
            co: None,
            no2: None,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hit_within_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(300), 64);
        cache.put("Paris", reading(12.0)).await;

        time::sleep(Duration::from_secs(299)).await;
        let hit = cache.get("Paris").await.unwrap();
        assert_eq!(hit.aqi, Some(12.0));
    }

    #[tokio::test(start_paused = true)]
    async fn miss_after_expiry() {
        let cache = ResponseCache::new(Duration::from_secs(300), 64);
        cache.put("Paris", reading(12.0)).await;

        time::sleep(Duration::from_secs(301)).await;
        assert!(cache.get("Paris").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn overflow_evicts_oldest() {
        let cache = ResponseCache::new(Duration::from_secs(300), 2);
        cache.put("A", reading(1.0)).await;
        time::sleep(Duration::from_secs(1)).await;
        cache.put("B", reading(2.0)).await;
        time::sleep(Duration::from_secs(1)).await;
        cache.put("C", reading(3.0)).await;

        assert!(cache.get("A").await.is_none());
        assert!(cache.get("B").await.is_some());
        assert!(cache.get("C").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_replaces_in_place() {
        let cache = ResponseCache::new(Duration::from_secs(300), 2);
        cache.put("A", reading(1.0)).await;
        cache.put("B", reading(2.0)).await;

        // Re-putting an existing key must not evict the other live entry.
        cache.put("A", reading(5.0)).await;

        assert_eq!(cache.get("A").await.unwrap().aqi, Some(5.0));
        assert!(cache.get("B").await.is_some());
    }
}
