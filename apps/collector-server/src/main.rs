//! # Airpulse Collector Server
//!
//! The main entry point: wires the collection pipeline, the periodic batch
//! job, and the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&telemetry::TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Airpulse collector server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    // Consume collection events onto the log.
    state
        .event_bus
        .subscribe("aqi_collected", |event| async move {
            tracing::info!(event = %event.payload, "event consumed");
        })
        .await;

    // Held for the lifetime of the server; dropping it would allow the
    // scheduler to shut down.
    #[cfg(feature = "scheduler")]
    let _scheduler = start_scheduler(&state).await?;

    // One forced pass at startup so the store is never empty.
    {
        let collector = state.collector.clone();
        let cities = state.monitored_cities.clone();
        tokio::spawn(async move {
            collector.force_collect_many(&cities).await;
        });
    }

    let (host, port) = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}

/// Register the periodic batch collection job.
#[cfg(feature = "scheduler")]
async fn start_scheduler(state: &AppState) -> anyhow::Result<background::scheduler::Scheduler> {
    use background::scheduler::{Scheduler, SchedulerConfig};

    let scheduler = Scheduler::new(SchedulerConfig::from_env()).await?;

    let collector = state.collector.clone();
    let cities = state.monitored_cities.clone();
    scheduler
        .add_cron("0 0/30 * * * *", move || {
            let collector = collector.clone();
            let cities = cities.clone();
            async move {
                tracing::info!("Running scheduled collection");
                collector.collect_many(&cities).await;
            }
        })
        .await?;

    scheduler.start().await?;
    Ok(scheduler)
}
