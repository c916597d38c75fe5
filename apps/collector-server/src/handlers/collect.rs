//! Administrative collection trigger.

use actix_web::{HttpResponse, web};

use airpulse_shared::ApiResponse;
use airpulse_shared::dto::CollectResponse;

use crate::state::AppState;

/// Force-refresh every monitored city in the background.
///
/// POST /api/collect
///
/// Per-city failures degrade silently inside the batch; the trigger itself
/// always succeeds.
pub async fn collect_all(state: web::Data<AppState>) -> HttpResponse {
    let collector = state.collector.clone();
    let cities = state.monitored_cities.clone();

    tokio::spawn(async move {
        collector.force_collect_many(&cities).await;
    });

    HttpResponse::Accepted().json(ApiResponse::ok_with_message(
        CollectResponse {
            cities: state.monitored_cities.as_ref().clone(),
        },
        "Collection started",
    ))
}
