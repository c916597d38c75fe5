//! Application state - the pipeline's composition root.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use airpulse_core::ports::{AirQualityProvider, PollutionRepository};
use airpulse_core::service::{Collector, Notifier};
use airpulse_infra::{
    ChannelBroadcaster, InMemoryEventBus, InMemoryPollutionRepository, ResponseCache, TokenBucket,
    WaqiClient, WaqiConfig,
};

use crate::config::AppConfig;

/// Shared application state.
///
/// The limiter and response cache live inside the WAQI client; everything
/// here is an explicit instance - no module-level singletons.
#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<Collector>,
    pub repo: Arc<dyn PollutionRepository>,
    pub broadcaster: Arc<ChannelBroadcaster>,
    pub event_bus: Arc<InMemoryEventBus>,
    pub monitored_cities: Arc<Vec<String>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let broadcaster = Arc::new(ChannelBroadcaster::default());
        let event_bus = Arc::new(InMemoryEventBus::default());

        let waqi_config = WaqiConfig {
            base_url: config.waqi.base_url.clone(),
            token: config.waqi.token.clone(),
            cached_cities: config
                .monitored_cities
                .iter()
                .cloned()
                .collect::<HashSet<_>>(),
            ..WaqiConfig::default()
        };
        let provider: Arc<dyn AirQualityProvider> = Arc::new(WaqiClient::new(
            waqi_config,
            TokenBucket::new(config.rate_limit_tokens_per_sec, config.rate_limit_burst),
            ResponseCache::new(config.response_cache_ttl, config.response_cache_capacity),
        ));

        let repo = Self::build_repository(config).await;

        let notifier = Notifier::new(event_bus.clone(), broadcaster.clone());
        let collector = Arc::new(Collector::new(
            provider,
            repo.clone(),
            notifier,
            Duration::from_secs(config.fetch_cache_minutes * 60),
        ));

        tracing::info!(
            cities = config.monitored_cities.len(),
            "Application state initialized"
        );

        Self {
            collector,
            repo,
            broadcaster,
            event_bus,
            monitored_cities: Arc::new(config.monitored_cities.clone()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn build_repository(config: &AppConfig) -> Arc<dyn PollutionRepository> {
        use airpulse_infra::PostgresPollutionRepository;
        use airpulse_infra::database::connect;

        if let Some(db_config) = &config.database {
            match connect(db_config).await {
                Ok(conn) => return Arc::new(PostgresPollutionRepository::new(conn)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }
        Arc::new(InMemoryPollutionRepository::new())
    }

    #[cfg(not(feature = "postgres"))]
    async fn build_repository(_config: &AppConfig) -> Arc<dyn PollutionRepository> {
        tracing::info!("Running without postgres feature - using in-memory repository");
        Arc::new(InMemoryPollutionRepository::new())
    }
}
