use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aditya-L1 CME monitor",
        description = "Solar wind, CME and space-weather snapshots assembled from NOAA SWPC and NASA DONKI feeds."
    ),
    paths(
        crate::routes::health::healthz_handler,
        crate::routes::solar_data::get_solar_data,
        crate::routes::solar_data::get_latest_snapshot,
        crate::routes::alerts::list_alerts,
        crate::routes::cme_detection::cme_detection,
    ),
    components(schemas(
        crate::routes::health::HealthResponse,
        crate::routes::solar_data::SolarDataResponse,
        crate::routes::alerts::AlertsResponse,
        crate::services::solar_processor::DashboardSnapshot,
        crate::services::solar_processor::Dataset,
        crate::services::solar_processor::TimeRange,
        crate::services::normalizer::UnifiedSample,
        crate::services::normalizer::CurrentConditions,
        crate::services::normalizer::ConditionLevels,
        crate::services::normalizer::ConditionLevel,
        crate::services::normalizer::FluxPoint,
        crate::services::normalizer::DataQuality,
        crate::services::cme::CmeEvent,
        crate::services::cme::CmeDirection,
        crate::services::cme::CmeIntensity,
        crate::services::cme::CmeStatus,
        crate::services::space_weather::FlareSummary,
        crate::services::space_weather::GeomagneticSummary,
        crate::services::donki::SpaceWeatherAlert,
        crate::services::donki::CmeHistory,
        crate::services::donki::CmeHistoryItem,
    )),
    tags(
        (name = "health"),
        (name = "solar-data", description = "Dashboard snapshots"),
        (name = "alerts", description = "DONKI notifications"),
        (name = "cme", description = "DONKI CME catalog"),
    )
)]
pub struct ApiDoc;

pub fn openapi_json() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi_json())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_handler))
}
