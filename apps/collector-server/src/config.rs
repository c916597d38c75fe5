//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use airpulse_infra::database::DatabaseConfig;

/// Cities collected by the periodic batch. They double as the cache
/// allow-list.
const DEFAULT_CITIES: &[&str] = &[
    "New York",
    "Los Angeles",
    "San Francisco",
    "Paris",
    "Delhi",
    "Perth",
];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub waqi: WaqiSettings,
    pub monitored_cities: Vec<String>,
    /// Staleness window for the collection pipeline, in minutes.
    pub fetch_cache_minutes: u64,
    pub rate_limit_tokens_per_sec: f64,
    pub rate_limit_burst: f64,
    pub response_cache_ttl: Duration,
    pub response_cache_capacity: usize,
}

/// Upstream WAQI API settings.
#[derive(Debug, Clone)]
pub struct WaqiSettings {
    pub token: String,
    pub base_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        let monitored_cities = env::var("MONITORED_CITIES")
            .map(|v| {
                v.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| DEFAULT_CITIES.iter().map(|c| c.to_string()).collect());

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            waqi: WaqiSettings {
                token: env::var("WAQI_TOKEN").unwrap_or_default(),
                base_url: env::var("WAQI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.waqi.info".to_string()),
            },
            monitored_cities,
            fetch_cache_minutes: env::var("FETCH_CACHE_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            rate_limit_tokens_per_sec: env::var("RATE_LIMIT_TOKENS_PER_SEC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16.0),
            rate_limit_burst: env::var("RATE_LIMIT_BURST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60.0),
            response_cache_ttl: Duration::from_secs(
                env::var("RESPONSE_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            response_cache_capacity: env::var("RESPONSE_CACHE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64),
        }
    }
}
