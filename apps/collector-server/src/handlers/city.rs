//! Per-city data endpoints.

use actix_web::{HttpResponse, web};
use chrono::{TimeDelta, Utc};

use airpulse_core::CollectError;
use airpulse_core::domain::PollutionRecord;
use airpulse_shared::ApiResponse;
use airpulse_shared::dto::{HistoryQuery, PollutionRecordDto};

use crate::middleware::error::AppError;
use crate::state::AppState;

fn to_dto(record: PollutionRecord) -> PollutionRecordDto {
    PollutionRecordDto {
        city: record.city,
        aqi: record.aqi,
        pm25: record.pm25,
        co: record.co,
        no2: record.no2,
        timestamp: record.timestamp.to_rfc3339(),
    }
}

/// Collect (if stale) and return the latest record for a city.
///
/// GET /api/data/{city}
pub async fn get_city_data(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let city = path.into_inner();

    state.collector.collect_city(&city, None).await?;

    let record = state
        .repo
        .latest_for_city(&city)
        .await
        .map_err(CollectError::from)?;

    match record {
        Some(record) => Ok(HttpResponse::Ok().json(ApiResponse::ok(to_dto(record)))),
        None => Err(AppError::NotFound(format!("No data for city {city}"))),
    }
}

/// Recent records for a city, oldest first.
///
/// GET /api/data/{city}/history?hours=24
pub async fn get_city_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let city = path.into_inner();
    let hours = query.hours.unwrap_or(24);
    if hours <= 0 {
        return Err(AppError::BadRequest("hours must be positive".to_string()));
    }

    let since = Utc::now() - TimeDelta::hours(hours);
    let records = state
        .repo
        .history_for_city(&city, since)
        .await
        .map_err(CollectError::from)?;

    let history: Vec<_> = records.into_iter().map(to_dto).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(history)))
}
