//! HTTP client for the WAQI air-quality feed.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use airpulse_core::domain::AirQualityReading;
use airpulse_core::error::FetchError;
use airpulse_core::ports::AirQualityProvider;

use crate::cache::ResponseCache;
use crate::rate_limit::TokenBucket;

use super::model::{FeedData, FeedEnvelope};

/// WAQI client configuration.
#[derive(Debug, Clone)]
pub struct WaqiConfig {
    pub base_url: String,
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
    pub max_attempts: u32,
    /// Base of the exponential backoff: attempt `i` waits `base << i`.
    pub retry_backoff: Duration,
    /// Cities eligible for response caching. Everything else bypasses the
    /// cache and fetches on every call.
    pub cached_cities: HashSet<String>,
}

impl Default for WaqiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.waqi.info".to_string(),
            token: String::new(),
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            cached_cities: HashSet::new(),
        }
    }
}

/// The fetcher: throttled, cached, retrying access to the WAQI feed.
///
/// HTTP 429 and 3xx responses are transient and retried with exponential
/// backoff; an `"error"` envelope is an application-level failure and is
/// not retried. Transport errors propagate as-is.
pub struct WaqiClient {
    http: reqwest::Client,
    config: WaqiConfig,
    limiter: TokenBucket,
    cache: ResponseCache,
}

impl WaqiClient {
    pub fn new(config: WaqiConfig, limiter: TokenBucket, cache: ResponseCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            limiter,
            cache,
        }
    }

    fn feed_url(&self, city: &str) -> String {
        let city = utf8_percent_encode(city, NON_ALPHANUMERIC);
        format!(
            "{}/feed/{}/",
            self.config.base_url.trim_end_matches('/'),
            city
        )
    }

    async fn fetch_remote(&self, city: &str) -> Result<AirQualityReading, FetchError> {
        let url = self.feed_url(city);

        for attempt in 0..self.config.max_attempts {
            self.limiter.acquire(1.0).await;

            let response = self
                .http
                .get(&url)
                .query(&[("token", self.config.token.as_str())])
                .timeout(self.config.timeout)
                .send()
                .await
                .map_err(|e| FetchError::Http(e.to_string()))?;

            let status = response.status();
            if status.as_u16() == 429 || status.is_redirection() {
                let backoff = self.config.retry_backoff * 2u32.pow(attempt);
                tracing::debug!(
                    city = %city,
                    status = %status,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "Transient upstream response, backing off"
                );
                tokio::time::sleep(backoff).await;
                continue;
            }

            let envelope: FeedEnvelope = response
                .json()
                .await
                .map_err(|e| FetchError::Http(e.to_string()))?;
            if !envelope.is_ok() {
                return Err(FetchError::Api(envelope.error_message()));
            }

            let data: FeedData = serde_json::from_value(envelope.data)
                .map_err(|e| FetchError::Http(e.to_string()))?;
            if let Some(time) = data.time.as_ref().and_then(|t| t.iso.as_deref()) {
                tracing::debug!(city = %city, station_time = %time, "Feed decoded");
            }

            return Ok(AirQualityReading {
                aqi: data.aqi,
                pm25: data.indicator("pm25"),
                co: data.indicator("co"),
                no2: data.indicator("no2"),
                timestamp: Utc::now(),
            });
        }

        Err(FetchError::RetriesExhausted {
            city: city.to_string(),
            attempts: self.config.max_attempts,
        })
    }
}

#[async_trait]
impl AirQualityProvider for WaqiClient {
    async fn fetch(&self, city: &str) -> Result<AirQualityReading, FetchError> {
        let cacheable = self.config.cached_cities.contains(city);
        if cacheable {
            if let Some(reading) = self.cache.get(city).await {
                tracing::debug!(city = %city, "Serving reading from cache");
                return Ok(reading);
            }
        }

        let reading = self.fetch_remote(city).await?;
        if cacheable {
            self.cache.put(city, reading.clone()).await;
        }
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Minimal loopback HTTP stub: serves the canned responses in order,
    /// one connection each, and counts the requests it saw.
    async fn spawn_stub(responses: Vec<String>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}"), hits)
    }

    fn ok_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    fn too_many_requests() -> String {
        "HTTP/1.1 429 Too Many Requests\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string()
    }

    fn client(base_url: String, cached_cities: HashSet<String>) -> WaqiClient {
        let config = WaqiConfig {
            base_url,
            token: "test-token".to_string(),
            retry_backoff: Duration::from_millis(10),
            cached_cities,
            ..WaqiConfig::default()
        };
        WaqiClient::new(
            config,
            TokenBucket::new(1000.0, 1000.0),
            ResponseCache::new(Duration::from_secs(300), 64),
        )
    }

    #[tokio::test]
    async fn throttled_then_ok_retries_once() {
        let body = r#"{"status":"ok","data":{"aqi":1,"iaqi":{}}}"#;
        let (base_url, hits) = spawn_stub(vec![too_many_requests(), ok_response(body)]).await;
        let client = client(base_url, HashSet::new());

        let reading = client.fetch("beijing").await.unwrap();

        assert_eq!(reading.aqi, Some(1.0));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn persistent_throttling_exhausts_retries() {
        let (base_url, hits) = spawn_stub(vec![
            too_many_requests(),
            too_many_requests(),
            too_many_requests(),
        ])
        .await;
        let client = client(base_url, HashSet::new());

        let err = client.fetch("beijing").await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::RetriesExhausted { attempts: 3, .. }
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn api_error_fails_without_retry() {
        let body = r#"{"status":"error","data":"Unknown station"}"#;
        let (base_url, hits) = spawn_stub(vec![ok_response(body)]).await;
        let client = client(base_url, HashSet::new());

        let err = client.fetch("nowhere").await.unwrap_err();

        match err {
            FetchError::Api(message) => assert_eq!(message, "Unknown station"),
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn allow_listed_city_is_served_from_cache() {
        let body = r#"{"status":"ok","data":{"aqi":7,"iaqi":{"pm25":{"v":3.0}}}}"#;
        let (base_url, hits) = spawn_stub(vec![ok_response(body)]).await;
        let client = client(base_url, HashSet::from(["Paris".to_string()]));

        let first = client.fetch("Paris").await.unwrap();
        let second = client.fetch("Paris").await.unwrap();

        assert_eq!(first.aqi, Some(7.0));
        assert_eq!(second.pm25, Some(3.0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn other_cities_bypass_the_cache() {
        let body = r#"{"status":"ok","data":{"aqi":7,"iaqi":{}}}"#;
        let (base_url, hits) =
            spawn_stub(vec![ok_response(body), ok_response(body)]).await;
        let client = client(base_url, HashSet::new());

        client.fetch("Oslo").await.unwrap();
        client.fetch("Oslo").await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn city_names_are_escaped_in_the_path() {
        let client = client("http://localhost:1".to_string(), HashSet::new());
        assert_eq!(
            client.feed_url("New York"),
            "http://localhost:1/feed/New%20York/"
        );
    }
}
