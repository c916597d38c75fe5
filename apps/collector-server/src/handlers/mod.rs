//! HTTP handlers and route configuration.

mod city;
mod collect;
mod health;
mod stream;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/collect", web::post().to(collect::collect_all))
            .route("/stream", web::get().to(stream::stream_updates))
            .service(
                web::scope("/data")
                    .route("/{city}", web::get().to(city::get_city_data))
                    .route("/{city}/history", web::get().to(city::get_city_history)),
            ),
    );
}
