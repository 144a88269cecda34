use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};

use crate::error::{AppError, AppResult};
use crate::services::solar_processor::{Dataset, DashboardSnapshot, TimeRange};
use crate::state::AppState;

const DATA_SOURCE_LABEL: &str = "NASA APIs";

#[derive(Debug, Clone, Default, serde::Deserialize, utoipa::IntoParams)]
pub(crate) struct SolarDataQuery {
    /// `aspex`, `suit` or `combined`; empty or absent means `aspex`.
    dataset: Option<String>,
    /// `1h`, `6h`, `24h` or `7d`; empty or absent means `24h`.
    range: Option<String>,
}

impl SolarDataQuery {
    fn selectors(&self) -> AppResult<(Dataset, TimeRange)> {
        let dataset = match self.dataset.as_deref().filter(|raw| !raw.is_empty()) {
            None => Dataset::default(),
            Some(raw) => raw
                .parse::<Dataset>()
                .map_err(|_| AppError::bad_request("Invalid dataset parameter"))?,
        };
        let range = match self.range.as_deref().filter(|raw| !raw.is_empty()) {
            None => TimeRange::default(),
            Some(raw) => raw
                .parse::<TimeRange>()
                .map_err(|_| AppError::bad_request("Invalid range parameter"))?,
        };
        Ok((dataset, range))
    }
}

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub(crate) struct SolarDataResponse {
    success: bool,
    data: DashboardSnapshot,
    timestamp: String,
    source: String,
}

#[utoipa::path(
    get,
    path = "/api/solar-data",
    tag = "solar-data",
    params(SolarDataQuery),
    responses(
        (status = 200, description = "Dashboard snapshot", body = SolarDataResponse),
        (status = 400, description = "Unknown dataset or range")
    )
)]
pub(crate) async fn get_solar_data(
    State(state): State<AppState>,
    Query(query): Query<SolarDataQuery>,
) -> AppResult<Json<SolarDataResponse>> {
    let (dataset, range) = query.selectors()?;
    let data = state.processor.fetch_solar_data(dataset, range).await;
    Ok(Json(SolarDataResponse {
        success: true,
        data,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        source: DATA_SOURCE_LABEL.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/solar-data/latest",
    tag = "solar-data",
    responses(
        (status = 200, description = "Most recent polled snapshot", body = DashboardSnapshot),
        (status = 404, description = "Poller has not produced a snapshot yet")
    )
)]
pub(crate) async fn get_latest_snapshot(
    State(state): State<AppState>,
) -> AppResult<Json<DashboardSnapshot>> {
    state
        .latest
        .latest()
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("No snapshot available yet"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/solar-data", get(get_solar_data))
        .route("/solar-data/latest", get(get_latest_snapshot))
}
