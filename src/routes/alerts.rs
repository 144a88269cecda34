use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{AppError, AppResult};
use crate::services::donki::SpaceWeatherAlert;
use crate::state::AppState;

const DEFAULT_DAYS: u32 = 7;
const MAX_DAYS: u32 = 30;

#[derive(Debug, Clone, Default, serde::Deserialize, utoipa::IntoParams)]
pub(crate) struct AlertsQuery {
    /// Look-back window in days (1-30, default 7).
    #[param(value_type = Option<u32>)]
    days: Option<String>,
    /// Comma-separated notification types, e.g. `CME,FLR`.
    types: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub(crate) struct AlertsResponse {
    alerts: Vec<SpaceWeatherAlert>,
}

fn parse_days(raw: Option<&str>) -> AppResult<u32> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(DEFAULT_DAYS);
    };
    let days = raw
        .parse::<u32>()
        .map_err(|_| AppError::bad_request("Invalid days parameter"))?;
    Ok(days.clamp(1, MAX_DAYS))
}

fn parse_types(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .map(str::to_string)
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "alerts",
    params(AlertsQuery),
    responses(
        (status = 200, description = "DONKI notifications, newest first", body = AlertsResponse),
        (status = 400, description = "Non-numeric days")
    )
)]
pub(crate) async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> AppResult<Json<AlertsResponse>> {
    let days = parse_days(query.days.as_deref())?;
    let types = parse_types(query.types.as_deref());
    let alerts = state.processor.fetch_alerts(days, &types).await;
    Ok(Json(AlertsResponse { alerts }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/alerts", get(list_alerts))
}

#[cfg(test)]
mod tests {
    use super::{parse_days, parse_types};

    #[test]
    fn types_split_on_commas() {
        assert_eq!(parse_types(Some(" CME, FLR,,")), vec!["CME", "FLR"]);
        assert!(parse_types(None).is_empty());
    }

    #[test]
    fn days_default_clamp_and_reject_non_numeric() {
        assert_eq!(parse_days(None).ok(), Some(7));
        assert_eq!(parse_days(Some("")).ok(), Some(7));
        assert_eq!(parse_days(Some("90")).ok(), Some(30));
        assert_eq!(parse_days(Some("0")).ok(), Some(1));
        let err = parse_days(Some("abc")).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid days parameter");
    }
}
